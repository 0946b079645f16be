//! Generates a header which allows to inspect at compile time the installed
//! pods and the installed specifications of a pod.
//!
//! Example output:
//!
//! ```text
//! #define COCOAPODS_POD_AVAILABLE_ObjectiveSugar
//! #define COCOAPODS_VERSION_MAJOR_ObjectiveSugar 0
//! #define COCOAPODS_VERSION_MINOR_ObjectiveSugar 6
//! #define COCOAPODS_VERSION_PATCH_ObjectiveSugar 2
//! ```
//!
//! Example usage:
//!
//! ```text
//! #ifdef COCOAPODS
//!   #ifdef COCOAPODS_POD_AVAILABLE_ObjectiveSugar
//!     #import "ObjectiveSugar.h"
//!   #endif
//! #else
//!   // Non CocoaPods code
//! #endif
//! ```

use std::fs;
use std::path::Path;

use compact_str::CompactString;
use podgen_types::{PodTarget, PodVersion, ResolvePodTarget};

/// Explanatory comment emitted at the top of every generated header.
static PREAMBLE: &str = "\n\
// To check if a library is compiled with CocoaPods you\n\
// can use the `COCOAPODS` macro definition which is\n\
// defined in the xcconfigs so it is available in\n\
// headers also when they are imported in the client\n\
// project.\n\n\n";

/// Generator for the target environment header.
///
/// Borrows its inputs from the caller for the duration of one emission; holds
/// no state across calls, so the output is a pure function of the inputs plus
/// the resolver's responses.
pub struct EnvironmentHeader<'a, D> {
    /// Target definitions installed for the aggregate target, in emission order.
    target_definitions: &'a [D],
    /// Names of the build configurations of the aggregate target.
    build_configs: &'a [CompactString],
}

impl<'a, D> EnvironmentHeader<'a, D> {
    /// Create a new [`EnvironmentHeader`].
    ///
    /// An empty `target_definitions` collection is legal and produces a header
    /// containing only the explanatory preamble. `build_configs` must be
    /// non-empty; this is checked when the header is rendered.
    pub fn new(target_definitions: &'a [D], build_configs: &'a [CompactString]) -> Self {
        EnvironmentHeader {
            target_definitions,
            build_configs,
        }
    }

    /// Generate the header and save it at `path`, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// * If the header cannot be rendered, see [`EnvironmentHeader::render`].
    /// * If creating or writing the file fails. There is no retry and no
    ///   cleanup of partially written content.
    pub fn save_as<R>(&self, resolver: &R, path: &Path) -> Result<(), Error>
    where
        R: ResolvePodTarget<D>,
    {
        let contents = self.render(resolver)?;
        tracing::debug!(
            ?path,
            targets = self.target_definitions.len(),
            "writing environment header"
        );
        fs::write(path, contents).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(())
    }

    /// Render the full header text.
    ///
    /// Emits one block per target definition, in the order the definitions
    /// were provided. Only the first specification of each resolved pod
    /// target is consulted, see [`podgen_types::PodTarget::specifications`].
    ///
    /// # Errors
    ///
    /// * If `build_configs` is empty.
    /// * If a resolved pod target exposes no specifications.
    /// * If two specification names sanitize to the same macro identifier,
    ///   which would make the header redefine macros.
    pub fn render<R>(&self, resolver: &R) -> Result<String, Error>
    where
        R: ResolvePodTarget<D>,
    {
        if self.build_configs.is_empty() {
            return Err(Error::NoBuildConfigs);
        }

        let mut out = String::from(PREAMBLE);
        let mut seen: Vec<(CompactString, CompactString)> = Vec::new();

        for (index, definition) in self.target_definitions.iter().enumerate() {
            let pod_target = resolver.resolve(definition);
            let specs = pod_target.specifications();
            let Some(spec) = specs.first() else {
                return Err(Error::NoSpecifications { index });
            };
            if specs.len() > 1 {
                tracing::debug!(
                    name = %spec.name,
                    ignored = specs.len() - 1,
                    "pod target exposes extra specifications"
                );
            }

            let id = macro_safe_name(&spec.name);
            if let Some((_, other)) = seen.iter().find(|(existing, _)| *existing == id) {
                return Err(Error::MacroCollision {
                    first: other.clone(),
                    second: spec.name.clone(),
                    id,
                });
            }
            seen.push((id.clone(), spec.name.clone()));

            out.push_str(&format!("// {}\n", spec.name));
            out.push_str(&format!("#define COCOAPODS_POD_HEADERS_AVAILABLE_{id}\n"));

            let whitelisted: Vec<&CompactString> = self
                .build_configs
                .iter()
                .filter(|config| {
                    pod_target.is_whitelisted_for_configuration(&spec.name, config.as_str())
                })
                .collect();
            if whitelisted.len() == self.build_configs.len() {
                out.push_str(&format!("#define COCOAPODS_POD_AVAILABLE_{id}\n"));
            } else {
                // A pod whitelisted in no configuration is never available;
                // `#if 0` keeps the output valid preprocessor text.
                let condition = if whitelisted.is_empty() {
                    "0".to_string()
                } else {
                    whitelisted
                        .iter()
                        .map(|config| format!("COCOAPODS_BUILD_CONFIGURATION_{config}"))
                        .collect::<Vec<_>>()
                        .join(" || ")
                };
                out.push_str(&format!("#if {condition}\n"));
                out.push_str(&format!("    #define COCOAPODS_POD_AVAILABLE_{id}\n"));
                out.push_str("#endif\n");
            }

            match &spec.version {
                PodVersion::Semantic(version) => {
                    out.push_str(&format!(
                        "#define COCOAPODS_VERSION_MAJOR_{id} {}\n",
                        version.major
                    ));
                    out.push_str(&format!(
                        "#define COCOAPODS_VERSION_MINOR_{id} {}\n",
                        version.minor
                    ));
                    out.push_str(&format!(
                        "#define COCOAPODS_VERSION_PATCH_{id} {}\n",
                        version.patch
                    ));
                }
                version => {
                    out.push_str("// This library does not follow semantic-versioning,\n");
                    out.push_str("// so we were not able to define version macros.\n");
                    out.push_str("// Please contact the author.\n");
                    out.push_str(&format!("// Version: {version}.\n"));
                }
            }

            out.push('\n');
        }

        Ok(out)
    }
}

/// Derive a macro-safe identifier from a specification name.
///
/// Every character that is not an ASCII word character (letter, digit,
/// underscore) is replaced 1:1 by an underscore, so the result has the same
/// character count as the input.
pub fn macro_safe_name(name: &str) -> CompactString {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Failures that can occur while emitting the environment header.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating or writing the destination file failed.
    #[error("failed to write environment header to '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A resolved pod target exposed no specifications.
    #[error("pod target for target definition {index} exposes no specifications")]
    NoSpecifications { index: usize },
    /// Two specification names sanitize to the same macro identifier.
    #[error("specifications '{first}' and '{second}' both produce macro identifier '{id}'")]
    MacroCollision {
        first: CompactString,
        second: CompactString,
        id: CompactString,
    },
    /// The aggregate target has no build configurations.
    #[error("build configuration list is empty")]
    NoBuildConfigs,
}
