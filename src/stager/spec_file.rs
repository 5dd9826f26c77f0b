//! Field extraction from RPM `.spec` files.

/// The fields of a spec file the stager needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecInfo {
    /// `Name:` tag.
    pub name: Option<String>,
    /// `Version:` tag.
    pub version: Option<String>,
    /// `Requires:` package names, version constraints dropped.
    pub requires: Vec<String>,
    /// `BuildRequires:` package names, version constraints dropped.
    pub build_requires: Vec<String>,
}

impl SpecInfo {
    /// Parses the preamble tags of a spec file. The last `Name:` and
    /// `Version:` win; dependency tags accumulate in file order.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut info = Self::default();
        for line in content.lines().map(str::trim) {
            if let Some(value) = tag_value(line, "Name:") {
                info.name = Some(value.to_string());
            } else if let Some(value) = tag_value(line, "Version:") {
                info.version = Some(value.to_string());
            } else if let Some(value) = tag_value(line, "Requires:") {
                info.requires.push(package_name(value).to_string());
            } else if let Some(value) = tag_value(line, "BuildRequires:") {
                info.build_requires.push(package_name(value).to_string());
            }
        }
        info.name = info.name.filter(|n| !n.is_empty());
        info.version = info.version.filter(|v| !v.is_empty());
        info
    }

    /// Requires followed by BuildRequires, keeping names that start with one
    /// of `prefixes`.
    #[must_use]
    pub fn dependencies(&self, prefixes: &[String]) -> Vec<String> {
        self.requires
            .iter()
            .chain(&self.build_requires)
            .filter(|dep| prefixes.iter().any(|p| dep.starts_with(p.as_str())))
            .cloned()
            .collect()
    }
}

fn tag_value<'a>(line: &'a str, tag: &str) -> Option<&'a str> {
    line.strip_prefix(tag).map(str::trim)
}

/// `ros-jazzy-foo >= 1.0` keeps only `ros-jazzy-foo`.
fn package_name(value: &str) -> &str {
    value.split(' ').next().unwrap_or_default()
}

/// Repository name for a package: `name` with `prefix` removed.
#[must_use]
pub fn repo_name<'a>(name: &'a str, prefix: &str) -> &'a str {
    name.strip_prefix(prefix).unwrap_or(name)
}

/// Renders the README placed in each staged repository.
#[must_use]
pub fn render_readme(name: &str, version: &str, dependencies: &[String]) -> String {
    let mut readme = format!(
        "# {name}\n\n## Version\n\n- Name: {name}\n- Version: {version}\n\n## Dependencies\n\n"
    );
    for dep in dependencies {
        readme.push_str(&format!("- {dep}\n"));
    }
    readme
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = "\
Name:           ros-jazzy-ament-cmake-auto
Version:        2.5.2
Release:        1%{?dist}
License:        Apache-2.0
Requires:       ros-jazzy-ament-cmake >= 2.5
Requires:       cmake
BuildRequires:  ament-package
BuildRequires:  python3-devel
  Requires: ros-jazzy-rclcpp

%description
Automatic CMake helpers.
";

    #[test]
    fn extracts_tags_and_dependency_names() {
        let info = SpecInfo::parse(SPEC);
        assert_eq!(info.name.as_deref(), Some("ros-jazzy-ament-cmake-auto"));
        assert_eq!(info.version.as_deref(), Some("2.5.2"));
        assert_eq!(info.requires, vec!["ros-jazzy-ament-cmake", "cmake", "ros-jazzy-rclcpp"]);
        assert_eq!(info.build_requires, vec!["ament-package", "python3-devel"]);
    }

    #[test]
    fn keeps_only_prefixed_dependencies() {
        let info = SpecInfo::parse(SPEC);
        let deps = info.dependencies(&["ros-".to_string(), "ament-".to_string()]);
        assert_eq!(deps, vec!["ros-jazzy-ament-cmake", "ros-jazzy-rclcpp", "ament-package"]);
    }

    #[test]
    fn empty_tags_count_as_missing() {
        let info = SpecInfo::parse("Name:\nVersion: 1.0\n");
        assert_eq!(info.name, None);
        assert_eq!(info.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn repo_name_strips_distribution_prefix() {
        assert_eq!(repo_name("ros-jazzy-ament-cmake-auto", "ros-jazzy-"), "ament-cmake-auto");
        assert_eq!(repo_name("urg_c", "ros-jazzy-"), "urg_c");
    }

    #[test]
    fn readme_lists_dependencies() {
        let readme = render_readme("ros-jazzy-foo", "1.0", &["ros-jazzy-bar".to_string()]);
        assert!(readme.starts_with("# ros-jazzy-foo\n"));
        assert!(readme.contains("- Version: 1.0\n"));
        assert!(readme.ends_with("## Dependencies\n\n- ros-jazzy-bar\n"));
    }
}
