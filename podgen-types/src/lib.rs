//! Types used throughout `podgen`.
//!
//! The goal of this crate is to be very lightweight, so take care with adding dependencies.

use std::fmt;

use compact_str::CompactString;

/// Versioned metadata for a single library component ("pod"), as resolved by
/// the dependency manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    /// Name of the specification, e.g. `ObjectiveSugar`.
    pub name: CompactString,
    /// Version of the specification.
    pub version: PodVersion,
}

impl Specification {
    /// Create a new [`Specification`].
    pub fn new<N: Into<CompactString>>(name: N, version: PodVersion) -> Self {
        Specification {
            name: name.into(),
            version,
        }
    }
}

/// Version of a [`Specification`].
///
/// Most pods follow semantic versioning, but some publish an opaque version
/// string such as `HEAD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PodVersion {
    /// A `major.minor.patch` semantic version, all parts non-negative integers.
    Semantic(semver::Version),
    /// Any other version string, kept verbatim.
    Other(CompactString),
}

impl PodVersion {
    /// Classify a raw version string.
    pub fn parse(raw: &str) -> PodVersion {
        match semver::Version::parse(raw) {
            Ok(version) => PodVersion::Semantic(version),
            Err(_) => PodVersion::Other(CompactString::new(raw)),
        }
    }

    /// Whether this version follows semantic versioning.
    pub fn is_semantic(&self) -> bool {
        matches!(self, PodVersion::Semantic(_))
    }
}

impl fmt::Display for PodVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PodVersion::Semantic(version) => write!(f, "{version}"),
            PodVersion::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Narrow read interface over one resolved build target and the
/// specifications it carries.
///
/// Implemented as an adapter over whatever richer dependency-graph model the
/// surrounding installer uses.
pub trait PodTarget {
    /// The specifications this pod target exposes, root specification first.
    ///
    /// Must be non-empty. Consumers only consult the first entry, so the
    /// implementor is responsible for putting the root specification there.
    fn specifications(&self) -> &[Specification];

    /// Whether the artifacts of `spec_name` are included in the build
    /// configuration named `config_name`.
    fn is_whitelisted_for_configuration(&self, spec_name: &str, config_name: &str) -> bool;
}

/// External collaborator that maps a target definition to the one pod target
/// it resolves to.
///
/// `D` is the caller's target definition type; it stays opaque to everything
/// downstream of the resolver.
pub trait ResolvePodTarget<D> {
    /// Concrete pod target type produced by this resolver.
    type Target: PodTarget;

    /// Resolve `definition` to its pod target.
    fn resolve<'d>(&self, definition: &'d D) -> &'d Self::Target;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoketest_parse_semantic() {
        let version = PodVersion::parse("2.3.1");
        assert!(version.is_semantic());
        let PodVersion::Semantic(version) = &version else {
            panic!("expected a semantic version");
        };
        assert_eq!(version.major, 2);
        assert_eq!(version.minor, 3);
        assert_eq!(version.patch, 1);
    }

    #[test]
    fn smoketest_parse_other() {
        let version = PodVersion::parse("HEAD");
        assert!(!version.is_semantic());
        assert_eq!(version, PodVersion::Other("HEAD".into()));

        // Two-part versions are not semantic.
        assert!(!PodVersion::parse("1.2").is_semantic());
    }

    #[test]
    fn smoketest_display_roundtrip() {
        assert_eq!(PodVersion::parse("0.6.2").to_string(), "0.6.2");
        assert_eq!(PodVersion::parse("HEAD").to_string(), "HEAD");
    }
}
