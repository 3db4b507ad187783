//! Ordered job → build-set map produced by discovery.

use crate::{BambooJob, Build};
use std::collections::{HashMap, HashSet};

/// Builds of one job, in discovery order, unique by build URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSet {
    builds: Vec<Build>,
    urls: HashSet<String>,
}

impl BuildSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `build` unless one with the same URL is already present.
    pub fn insert(&mut self, build: Build) -> bool {
        if !self.urls.insert(build.build_url.clone()) {
            return false;
        }
        self.builds.push(build);
        true
    }

    #[must_use]
    pub fn contains_url(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Build> {
        self.builds.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Build> {
        self.builds
    }
}

impl Extend<Build> for BuildSet {
    fn extend<I: IntoIterator<Item = Build>>(&mut self, iter: I) {
        for build in iter {
            self.insert(build);
        }
    }
}

impl FromIterator<Build> for BuildSet {
    fn from_iter<I: IntoIterator<Item = Build>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for BuildSet {
    type Item = Build;
    type IntoIter = std::vec::IntoIter<Build>;

    fn into_iter(self) -> Self::IntoIter {
        self.builds.into_iter()
    }
}

impl<'a> IntoIterator for &'a BuildSet {
    type Item = &'a Build;
    type IntoIter = std::slice::Iter<'a, Build>;

    fn into_iter(self) -> Self::IntoIter {
        self.builds.iter()
    }
}

/// Jobs in the order they were discovered, each with its accumulated builds.
///
/// Inserting an already-known job merges into its existing set instead of
/// replacing it, which is how branch builds land under their parent plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBuildMap {
    entries: Vec<(BambooJob, BuildSet)>,
    index: HashMap<BambooJob, usize>,
}

impl JobBuildMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the set for `job`, registering the job if it is new.
    pub fn entry(&mut self, job: BambooJob) -> &mut BuildSet {
        let idx = match self.index.get(&job) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.index.insert(job.clone(), idx);
                self.entries.push((job, BuildSet::new()));
                idx
            }
        };
        &mut self.entries[idx].1
    }

    /// Merges `builds` into the set for `job`.
    pub fn merge<I>(&mut self, job: BambooJob, builds: I)
    where
        I: IntoIterator<Item = Build>,
    {
        self.entry(job).extend(builds);
    }

    #[must_use]
    pub fn get(&self, job: &BambooJob) -> Option<&BuildSet> {
        self.index.get(job).map(|&idx| &self.entries[idx].1)
    }

    /// Looks a job up by its plan key.
    #[must_use]
    pub fn get_by_name(&self, job_name: &str) -> Option<(&BambooJob, &BuildSet)> {
        self.entries
            .iter()
            .find(|(job, _)| job.job_name == job_name)
            .map(|(job, builds)| (job, builds))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn jobs(&self) -> impl Iterator<Item = &BambooJob> {
        self.entries.iter().map(|(job, _)| job)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BambooJob, &BuildSet)> {
        self.entries.iter().map(|(job, builds)| (job, builds))
    }

    /// Total number of builds across all jobs.
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.entries.iter().map(|(_, builds)| builds.len()).sum()
    }
}

impl IntoIterator for JobBuildMap {
    type Item = (BambooJob, BuildSet);
    type IntoIter = std::vec::IntoIter<(BambooJob, BuildSet)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str) -> BambooJob {
        BambooJob::new(
            "http://bamboo",
            name,
            format!("http://bamboo/rest/api/latest/plan/{name}"),
        )
    }

    #[test]
    fn build_set_drops_duplicate_urls() {
        let mut set = BuildSet::new();
        assert!(set.insert(Build::summary("1", "http://bamboo/r/A-B/1")));
        assert!(!set.insert(Build::summary("1", "http://bamboo/r/A-B/1")));
        assert!(set.insert(Build::summary("2", "http://bamboo/r/A-B/2")));
        assert_eq!(set.len(), 2);
        assert!(set.contains_url("http://bamboo/r/A-B/2"));
    }

    #[test]
    fn merge_keeps_existing_builds_and_job_order() {
        let mut map = JobBuildMap::new();
        map.merge(job("B-PLAN"), [Build::summary("1", "u/b/1")]);
        map.merge(job("A-PLAN"), [Build::summary("1", "u/a/1")]);
        map.merge(
            job("B-PLAN"),
            [Build::summary("1", "u/b/1"), Build::summary("1", "u/b1/1")],
        );

        let names: Vec<_> = map.jobs().map(|j| j.job_name.as_str()).collect();
        assert_eq!(names, ["B-PLAN", "A-PLAN"]);

        let urls: Vec<_> = map
            .get(&job("B-PLAN"))
            .unwrap()
            .iter()
            .map(|b| b.build_url.as_str())
            .collect();
        assert_eq!(urls, ["u/b/1", "u/b1/1"]);
        assert_eq!(map.build_count(), 3);
    }

    #[test]
    fn entry_registers_job_without_builds() {
        let mut map = JobBuildMap::new();
        map.entry(job("EMPTY-PLAN"));
        assert_eq!(map.len(), 1);
        assert!(map.get_by_name("EMPTY-PLAN").unwrap().1.is_empty());
    }
}
