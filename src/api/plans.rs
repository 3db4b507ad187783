//! Plan → result → branch discovery.

use crate::{
    BambooJob, BlockingClient, Build, BuildNumber, Error, JobBuildMap,
    json::{get_nested_array, get_string, require_scalar, require_str},
    util::url::{join_url, rewrite_localhost},
};
use serde_json::Value;

const PLANS_URL_SUFFIX: &str = "rest/api/latest/plan?expand=plans&max-result=2000";
const RESULTS_URL_SUFFIX: &str = "rest/api/latest/result/";

/// Discovers every plan of an instance and the builds under it.
#[derive(Clone)]
pub struct PlansService {
    client: BlockingClient,
}

impl PlansService {
    pub(crate) fn new(client: BlockingClient) -> Self {
        Self { client }
    }

    /// Every plan on `instance_url` with the summaries (number + URL) of its
    /// builds, including builds of its branches.
    ///
    /// A plan whose payload cannot be parsed is logged and skipped. A malformed
    /// URL stops the crawl and returns what was found so far. Communication
    /// failures (network or HTTP status) abort and are returned.
    pub fn instance_jobs(&self, instance_url: &str) -> Result<JobBuildMap, Error> {
        let mut jobs = JobBuildMap::new();
        match self.crawl(instance_url, &mut jobs) {
            Ok(()) => Ok(jobs),
            Err(err) if err.is_transport_failure() => {
                tracing::error!(error = %err, "client exception loading jobs");
                Err(err)
            }
            Err(err @ (Error::InvalidUrl { .. } | Error::UrlEncoding { .. })) => {
                tracing::error!(error = %err, "malformed url for loading jobs");
                Ok(jobs)
            }
            Err(err) => {
                tracing::error!(error = %err, "parsing jobs on instance");
                Ok(jobs)
            }
        }
    }

    fn crawl(&self, instance_url: &str, jobs: &mut JobBuildMap) -> Result<(), Error> {
        let plans_url = join_url(instance_url, [PLANS_URL_SUFFIX]);
        let plans = self.client.fetch_json(&plans_url, "plan list")?;

        for plan in get_nested_array(&plans, "plans", "plan") {
            match self.crawl_plan(instance_url, plan, jobs) {
                Ok(()) => {}
                Err(err) if err.is_parse_failure() => {
                    tracing::warn!(
                        plan = get_string(plan, "key").unwrap_or("<unknown>"),
                        error = %err,
                        "skipping plan"
                    );
                }
                Err(err) => return Err(err),
            }
        }

        tracing::debug!(
            jobs = jobs.len(),
            builds = jobs.build_count(),
            "instance crawl finished"
        );
        Ok(())
    }

    fn crawl_plan(
        &self,
        instance_url: &str,
        plan: &Value,
        jobs: &mut JobBuildMap,
    ) -> Result<(), Error> {
        let plan_name = require_str(plan, "key", "plan")?;
        let plan_url = plan
            .get("link")
            .and_then(|link| get_string(link, "href"))
            .ok_or_else(|| Error::parse(plan_name, "missing `link.href`"))?;
        tracing::debug!(plan = plan_name, url = plan_url, "plan discovered");

        let job = BambooJob::new(instance_url, plan_name, plan_url);
        let builds = self.result_builds(instance_url, plan_name)?;
        jobs.merge(job.clone(), builds);

        // Branches report their results under their own key but belong to
        // the parent plan.
        let branches_url = join_url(plan_url, ["/branch"]);
        let branches = self.client.fetch_json(&branches_url, plan_name)?;
        for branch in get_nested_array(&branches, "branches", "branch") {
            let sub_plan = require_scalar(branch, "key", plan_name)?;
            tracing::debug!(plan = plan_name, sub_plan = %sub_plan, "branch discovered");
            let builds = self.result_builds(instance_url, &sub_plan)?;
            jobs.merge(job.clone(), builds);
        }
        Ok(())
    }

    /// Summaries from `result/{plan_key}`, skipping the `0` placeholder.
    ///
    /// The build URL is composed from the result URL rather than taken from
    /// the payload, then passed through the Docker `localhost` override.
    fn result_builds(&self, instance_url: &str, plan_key: &str) -> Result<Vec<Build>, Error> {
        let result_url = join_url(instance_url, [RESULTS_URL_SUFFIX, plan_key]);
        let results = self.client.fetch_json(&result_url, plan_key)?;
        let localhost_override = self.client.settings().localhost_override();

        let mut builds = Vec::new();
        for result in get_nested_array(&results, "results", "result") {
            let number = BuildNumber::new(require_scalar(result, "buildNumber", plan_key)?);
            if number.is_placeholder() {
                continue;
            }
            let build_url = rewrite_localhost(
                &join_url(&result_url, [number.as_str()]),
                localhost_override,
            );
            tracing::debug!(plan = plan_key, build = %number, url = %build_url, "adding build");
            builds.push(Build::summary(number, build_url));
        }
        Ok(builds)
    }
}
