//! Plain-text rendering of warnings.
//!
//! Locations are resolved only here, through the caller's [`LocationResolver`].

use shapecheck_common::limits::MAX_REPORTED_DIFF_PATHS;
use shapecheck_common::{LocationId, LocationResolver};
use std::fmt;

use crate::table::TypeTable;
use crate::type_diff::TypeDiff;
use crate::warnings::{Origin, TypeDescription, Warning};

/// `Display` adapter for a [`TypeDescription`].
pub struct DescriptionDisplay<'a> {
    description: &'a TypeDescription,
    locations: &'a dyn LocationResolver,
}

impl TypeDescription {
    pub fn display<'a>(&'a self, locations: &'a dyn LocationResolver) -> DescriptionDisplay<'a> {
        DescriptionDisplay {
            description: self,
            locations,
        }
    }
}

impl fmt::Display for DescriptionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.description.kind();
        match self.description.origin() {
            Origin::Unknown => f.write_str(kind),
            Origin::Location(id) => {
                write!(f, "{kind} originated at {}", self.locations.resolve(id))
            }
            Origin::Literal(text) => write!(f, "{kind} originated at {text}"),
        }
    }
}

/// `Display` adapter rendering a [`Warning`] as a multi-line report.
pub struct WarningDisplay<'a> {
    warning: &'a Warning,
    table: &'a TypeTable,
    locations: &'a dyn LocationResolver,
}

impl Warning {
    pub fn display<'a>(
        &'a self,
        table: &'a TypeTable,
        locations: &'a dyn LocationResolver,
    ) -> WarningDisplay<'a> {
        WarningDisplay {
            warning: self,
            table,
            locations,
        }
    }
}

impl WarningDisplay<'_> {
    fn found_at(&self, f: &mut fmt::Formatter<'_>, sites: &[LocationId]) -> fmt::Result {
        for site in sites {
            writeln!(f, "        found at {}", self.locations.resolve(site))?;
        }
        Ok(())
    }
}

impl fmt::Display for WarningDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.warning {
            Warning::Inconsistent(warning) => {
                writeln!(
                    f,
                    "Warning {}: {} of {} has multiple types:",
                    warning.id,
                    warning.field,
                    warning.owner.display(self.locations)
                )?;
                for observed in &warning.observed {
                    writeln!(f, "    {}", observed.description.display(self.locations))?;
                    self.found_at(f, &observed.locations)?;
                }
                if let Some(diff) = warning.type_diff.as_ref().filter(|diff| !diff.is_empty()) {
                    writeln!(f)?;
                    writeln!(f, "    Type diff:")?;
                    for line in diff_lines(diff, self.table) {
                        writeln!(f, "        {line}")?;
                    }
                }
                Ok(())
            }
            Warning::UndefinedField(warning) => {
                writeln!(
                    f,
                    "Warning {}: undefined field found in {}:",
                    warning.id,
                    warning.owner.display(self.locations)
                )?;
                self.found_at(f, &warning.locations)
            }
        }
    }
}

/// `<path> has types <a>,<b>` for the first few differing paths.
///
/// Paths come in sorted order, the types of a path sorted by name.
pub fn diff_lines(diff: &TypeDiff, table: &TypeTable) -> Vec<String> {
    diff.diff
        .iter()
        .take(MAX_REPORTED_DIFF_PATHS)
        .map(|(path, types)| {
            let mut names: Vec<&str> = types.iter().map(|ty| table.resolve(*ty)).collect();
            names.sort_unstable();
            format!("{path} has types {}", names.join(","))
        })
        .collect()
}

#[cfg(test)]
#[path = "tests/format_tests.rs"]
mod tests;
