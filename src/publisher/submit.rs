//! Submits Package Submission List entries to the build farm.

use crate::ports::{BuildFarm, FarmProject, PortError, ScmSource};
use crate::publisher::descriptor::PackageDescriptor;

/// Outcome of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The farm accepted the package.
    Submitted {
        /// Id assigned by the farm, when reported.
        id: Option<u64>,
    },
    /// The descriptor was not submitted because it is unusable.
    Dropped {
        /// Why it was dropped.
        reason: String,
    },
    /// The farm rejected the submission or could not be reached.
    Failed {
        /// Error returned by the farm.
        error: PortError,
    },
}

/// Per-descriptor outcomes in list order.
#[derive(Debug, Default)]
pub struct SubmitReport {
    /// Package name (or a placeholder for unnamed entries) and outcome.
    pub outcomes: Vec<(String, SubmitOutcome)>,
}

impl SubmitReport {
    /// Number of accepted submissions.
    #[must_use]
    pub fn submitted(&self) -> usize {
        self.outcomes.iter().filter(|(_, o)| matches!(o, SubmitOutcome::Submitted { .. })).count()
    }
}

/// Looks up the target project.
///
/// # Errors
///
/// Returns the farm error; [`PortError::NotFound`] means the project has to
/// be created first.
pub async fn ensure_project(
    farm: &dyn BuildFarm,
    owner: &str,
    project: &str,
) -> Result<FarmProject, PortError> {
    let found = farm.get_project(owner, project).await?;
    log::info!("using build-farm project {owner}/{project}");
    Ok(found)
}

/// Builds the SCM source for a descriptor built from `branch`.
#[must_use]
pub fn scm_source(descriptor: &PackageDescriptor, branch: &str) -> ScmSource {
    ScmSource {
        clone_url: descriptor.clone_url.clone(),
        committish: branch.to_string(),
        subdirectory: String::new(),
        spec: descriptor.spec_name.clone(),
        scm_type: "git".to_string(),
    }
}

fn is_http(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Submits every usable descriptor, one at a time.
///
/// Each submission is isolated: a failure is logged and recorded, never
/// retried, and the remaining descriptors are still submitted.
pub async fn submit_all(
    farm: &dyn BuildFarm,
    owner: &str,
    project: &str,
    branch: &str,
    descriptors: &[PackageDescriptor],
) -> SubmitReport {
    let mut report = SubmitReport::default();
    for (index, descriptor) in descriptors.iter().enumerate() {
        let label = if descriptor.package_name.is_empty() {
            format!("entry #{}", index + 1)
        } else {
            descriptor.package_name.clone()
        };

        let missing: Vec<_> = descriptor
            .missing_fields()
            .into_iter()
            .filter(|f| matches!(*f, "package_name" | "clone_url" | "spec_name"))
            .collect();
        if !missing.is_empty() {
            log::warn!("{label} is incomplete (missing {missing:?}), skipping");
            let reason = format!("missing {}", missing.join(", "));
            report.outcomes.push((label, SubmitOutcome::Dropped { reason }));
            continue;
        }
        if !is_http(&descriptor.clone_url) {
            log::error!("{label} has a non-HTTP clone URL {}, skipping", descriptor.clone_url);
            let reason = format!("clone URL {} is not http(s)", descriptor.clone_url);
            report.outcomes.push((label, SubmitOutcome::Dropped { reason }));
            continue;
        }

        log::info!("submitting {label} => {}", descriptor.clone_url);
        let source = scm_source(descriptor, branch);
        let outcome = match farm.add_package(owner, project, &descriptor.package_name, &source).await
        {
            Ok(package) => {
                log::info!("{label} submitted (id {:?})", package.id);
                SubmitOutcome::Submitted { id: package.id }
            }
            Err(error) => {
                log::error!("submitting {label} failed: {error}");
                SubmitOutcome::Failed { error }
            }
        };
        report.outcomes.push((label, outcome));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{calls, FakeFarm};
    use crate::publisher::descriptor::Naming;

    fn descriptors(names: &[&str]) -> Vec<PackageDescriptor> {
        let naming = Naming {
            web_base: "https://gitee.com".into(),
            package_prefix: "Ros-jazzy-".into(),
            spec_suffix: ".spec".into(),
        };
        names.iter().map(|n| naming.describe(n, &format!("porter/{n}"))).collect()
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_batch() {
        let farm =
            FakeFarm { rejects: ["Ros-jazzy-p2".to_string()].into(), ..FakeFarm::default() };
        let list = descriptors(&["p1", "p2", "p3", "p4", "p5"]);

        let report = submit_all(&farm, "porter", "Jazzy_Porting", "branch", &list).await;

        assert_eq!(calls(&farm.calls).len(), 5);
        assert_eq!(report.outcomes.len(), 5);
        assert_eq!(report.submitted(), 4);
        assert!(matches!(report.outcomes[1].1, SubmitOutcome::Failed { .. }));
        let attempted: Vec<&str> = report.outcomes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(attempted, vec!["Ros-jazzy-p1", "Ros-jazzy-p2", "Ros-jazzy-p3", "Ros-jazzy-p4", "Ros-jazzy-p5"]);
    }

    #[tokio::test]
    async fn descriptor_missing_spec_name_is_dropped() {
        let farm = FakeFarm::default();
        let mut list = descriptors(&["a", "b", "c"]);
        list[1].spec_name.clear();

        let report = submit_all(&farm, "porter", "Jazzy_Porting", "branch", &list).await;

        assert_eq!(report.submitted(), 2);
        assert_eq!(
            report.outcomes[1],
            ("Ros-jazzy-b".to_string(), SubmitOutcome::Dropped { reason: "missing spec_name".into() })
        );
        assert!(!calls(&farm.calls).iter().any(|c| c.contains("Ros-jazzy-b")));
    }

    #[tokio::test]
    async fn non_http_clone_url_is_dropped() {
        let farm = FakeFarm::default();
        let mut list = descriptors(&["a"]);
        list[0].clone_url = "git@gitee.com:porter/a.git".into();

        let report = submit_all(&farm, "porter", "Jazzy_Porting", "branch", &list).await;
        assert!(matches!(report.outcomes[0].1, SubmitOutcome::Dropped { .. }));
        assert!(calls(&farm.calls).is_empty());
    }

    #[test]
    fn scm_source_builds_from_target_branch() {
        let d = &descriptors(&["urg_c"])[0];
        let source = scm_source(d, "Multi-Version_ros-jazzy_openEuler-24.03-LTS");
        assert_eq!(source.committish, "Multi-Version_ros-jazzy_openEuler-24.03-LTS");
        assert_eq!(source.spec, "urg_c.spec");
        assert_eq!(source.subdirectory, "");
        assert_eq!(source.scm_type, "git");
    }

    #[tokio::test]
    async fn missing_project_is_not_found() {
        let farm = FakeFarm::default();
        let err = ensure_project(&farm, "porter", "Jazzy_Porting").await.unwrap_err();
        assert!(matches!(err, PortError::NotFound { .. }));
    }
}
