//! Package existence oracle backed by `dnf list`.

use crate::ports::ShellExecutor;

/// Asks the target distribution's package manager whether a package exists.
pub struct DnfOracle<'a> {
    shell: &'a dyn ShellExecutor,
}

impl<'a> DnfOracle<'a> {
    /// Creates an oracle running `dnf` through `shell`.
    #[must_use]
    pub fn new(shell: &'a dyn ShellExecutor) -> Self {
        Self { shell }
    }

    /// Returns `true` when `dnf list <pkg>` succeeds and mentions `pkg`.
    ///
    /// Failing to run `dnf` at all counts as "does not exist".
    #[must_use]
    pub fn exists(&self, pkg: &str) -> bool {
        log::debug!("dnf list {pkg}");
        match self.shell.run("dnf", &["list", pkg]) {
            Ok(output) if output.success() && output.stdout.contains(pkg) => {
                log::debug!("found package {pkg}");
                true
            }
            Ok(output) => {
                log::debug!("package {pkg} not found (exit code {})", output.exit_code);
                false
            }
            Err(e) => {
                log::warn!("could not check package {pkg}: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{calls, FakeDnf};
    use crate::ports::{PortError, ShellOutput};

    struct Canned(ShellOutput);

    impl ShellExecutor for Canned {
        fn run(&self, _program: &str, _args: &[&str]) -> Result<ShellOutput, PortError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn runs_dnf_list_with_the_package_name() {
        let dnf = FakeDnf::with(&["cmake"]);
        assert!(DnfOracle::new(&dnf).exists("cmake"));
        assert!(!DnfOracle::new(&dnf).exists("libfoo"));
        assert_eq!(calls(&dnf.calls), vec!["dnf list cmake", "dnf list libfoo"]);
    }

    #[test]
    fn success_without_the_name_in_stdout_is_absent() {
        let shell = Canned(ShellOutput {
            exit_code: 0,
            stdout: "Last metadata expiration check\n".into(),
            stderr: String::new(),
        });
        assert!(!DnfOracle::new(&shell).exists("cmake"));
    }

    #[test]
    fn process_errors_are_absent() {
        let dnf = FakeDnf { broken: true, ..FakeDnf::default() };
        assert!(!DnfOracle::new(&dnf).exists("cmake"));
    }
}
