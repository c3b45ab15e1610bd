//! Category policy table.
//!
//! Every category is a variant of a closed enum carrying its own immutable
//! policy record. Policies are compiled in, built once, and passed explicitly
//! into the validator and build executor; nothing downstream consults global
//! state.

use crate::exec::limits::ResourceCeilings;

/// Closed set of evaluation categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    /// Restricted includes, 512-byte ceiling.
    Plain,
    /// No preprocessor at all, 1024-byte ceiling.
    Barehands,
    /// No lexical restriction; declared packages must be installed.
    Anything,
    /// The strictest mode: 128 bytes, hard size rejection, first error only.
    Compact,
    /// Gated by a byte-reversing reference program.
    Roundtrip,
}

impl Category {
    /// Fixed evaluation order for a run.
    pub const ALL: [Category; 5] = [
        Category::Plain,
        Category::Barehands,
        Category::Anything,
        Category::Compact,
        Category::Roundtrip,
    ];

    /// Human-readable category name, also the table heading.
    pub fn name(self) -> &'static str {
        self.policy().dir_name
    }

    /// The immutable policy for this category.
    pub fn policy(self) -> &'static CategoryPolicy {
        match self {
            Category::Plain => &PLAIN,
            Category::Barehands => &BAREHANDS,
            Category::Anything => &ANYTHING,
            Category::Compact => &COMPACT,
            Category::Roundtrip => &ROUNDTRIP,
        }
    }
}

/// Lexical rule applied line by line to the submission source.
#[derive(Clone, Copy, Debug)]
pub enum LexicalPolicy {
    /// No restriction on source contents.
    Unrestricted,
    /// Preprocessor markers are banned everywhere and no include directive
    /// is recognized.
    NoPreprocessor,
    /// Include directives are recognized and their argument must belong to
    /// the permitted set; banned markers reject everywhere else.
    RestrictedIncludes(&'static [&'static str]),
}

/// Immutable per-category configuration.
#[derive(Debug)]
pub struct CategoryPolicy {
    pub category: Category,
    /// Directory under the contest root holding this category's entries.
    pub dir_name: &'static str,
    /// Source byte ceiling.
    pub size_ceiling: usize,
    /// Whether exceeding the ceiling rejects the entry outright. The laxer
    /// categories only flag oversize sources.
    pub oversize_rejects: bool,
    pub lexical: LexicalPolicy,
    /// Whether the package list must exist and resolve fully.
    pub requires_packages: bool,
    /// Whether the include-path list may extend the compiler search path.
    pub allows_include_paths: bool,
    /// Whether a paired reference source gates this category.
    pub requires_reference: bool,
    /// Extra compiler flags appended after the common flag set.
    pub extra_build_flags: &'static [&'static str],
    /// Ceilings applied to every child process spawned for this category.
    pub ceilings: ResourceCeilings,
}

/// Metadata record filename, present in every entry directory.
pub const INFO_FILE: &str = "info.txt";
/// Package list, one name per line.
pub const PACKAGES_FILE: &str = "packages.txt";
/// Include search paths, one per line.
pub const INCLUDES_FILE: &str = "includes.txt";
/// Paired reference source for the round-trip category.
pub const REFERENCE_FILE: &str = "reference.cpp";
/// Extension of the canonical submission source.
pub const SOURCE_EXT: &str = "cpp";

/// Headers a restricted category may include.
pub const PERMITTED_INCLUDES: &[&str] = &[
    "vector",
    "map",
    "iostream",
    "functional",
    "memory",
    "utility",
    "stdexcept",
    "string",
    "set",
    "unordered_map",
    "unordered_set",
    "regex",
    "array",
    "stack",
    "queue",
    "algorithm",
    "iterator",
    "complex",
    "atomic",
    "thread",
    "mutex",
    "future",
    "typeinfo",
    "tuple",
    "initializer_list",
];

static PLAIN: CategoryPolicy = CategoryPolicy {
    category: Category::Plain,
    dir_name: "plain",
    size_ceiling: 512,
    oversize_rejects: false,
    lexical: LexicalPolicy::RestrictedIncludes(PERMITTED_INCLUDES),
    requires_packages: false,
    allows_include_paths: false,
    requires_reference: false,
    extra_build_flags: &[],
    ceilings: ResourceCeilings::contest_default(),
};

static BAREHANDS: CategoryPolicy = CategoryPolicy {
    category: Category::Barehands,
    dir_name: "barehands",
    size_ceiling: 1024,
    oversize_rejects: false,
    lexical: LexicalPolicy::NoPreprocessor,
    requires_packages: false,
    allows_include_paths: false,
    requires_reference: false,
    extra_build_flags: &[],
    ceilings: ResourceCeilings::contest_default(),
};

static ANYTHING: CategoryPolicy = CategoryPolicy {
    category: Category::Anything,
    dir_name: "anything",
    size_ceiling: 256,
    oversize_rejects: false,
    lexical: LexicalPolicy::Unrestricted,
    requires_packages: true,
    allows_include_paths: true,
    requires_reference: false,
    extra_build_flags: &[],
    ceilings: ResourceCeilings::contest_default(),
};

static COMPACT: CategoryPolicy = CategoryPolicy {
    category: Category::Compact,
    dir_name: "compact",
    size_ceiling: 128,
    oversize_rejects: true,
    lexical: LexicalPolicy::RestrictedIncludes(PERMITTED_INCLUDES),
    requires_packages: false,
    allows_include_paths: false,
    requires_reference: false,
    extra_build_flags: &["-fmax-errors=1"],
    ceilings: ResourceCeilings::contest_default(),
};

static ROUNDTRIP: CategoryPolicy = CategoryPolicy {
    category: Category::Roundtrip,
    dir_name: "roundtrip",
    size_ceiling: 512,
    oversize_rejects: false,
    lexical: LexicalPolicy::Unrestricted,
    requires_packages: false,
    allows_include_paths: false,
    requires_reference: true,
    extra_build_flags: &[],
    ceilings: ResourceCeilings::contest_default(),
};

impl CategoryPolicy {
    /// Canonical source filename for an identifier.
    pub fn source_filename(&self, identifier: &str) -> String {
        format!("{identifier}.{SOURCE_EXT}")
    }

    /// Complete set of filenames an entry directory may contain.
    pub fn allowed_files(&self, identifier: &str) -> Vec<String> {
        let mut allowed = vec![INFO_FILE.to_string(), self.source_filename(identifier)];
        if self.requires_packages {
            allowed.push(PACKAGES_FILE.to_string());
        }
        if self.allows_include_paths {
            allowed.push(INCLUDES_FILE.to_string());
        }
        if self.requires_reference {
            allowed.push(REFERENCE_FILE.to_string());
        }
        allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_order_is_stable() {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec!["plain", "barehands", "anything", "compact", "roundtrip"]
        );
    }

    #[test]
    fn test_only_compact_hard_rejects_oversize() {
        for category in Category::ALL {
            let policy = category.policy();
            assert_eq!(
                policy.oversize_rejects,
                category == Category::Compact,
                "unexpected oversize handling for {:?}",
                category
            );
        }
        assert_eq!(Category::Compact.policy().size_ceiling, 128);
    }

    #[test]
    fn test_anything_owns_the_auxiliary_lists() {
        for category in Category::ALL {
            let policy = category.policy();
            let allowed = policy.allowed_files("abc");
            assert!(allowed.contains(&"info.txt".to_string()));
            assert!(allowed.contains(&"abc.cpp".to_string()));
            assert_eq!(
                allowed.contains(&"packages.txt".to_string()),
                category == Category::Anything
            );
            assert_eq!(
                allowed.contains(&"includes.txt".to_string()),
                category == Category::Anything
            );
            assert_eq!(
                allowed.contains(&"reference.cpp".to_string()),
                category == Category::Roundtrip
            );
        }
    }

    #[test]
    fn test_compact_limits_diagnostics_to_first_error() {
        assert_eq!(Category::Compact.policy().extra_build_flags, &["-fmax-errors=1"]);
        assert!(Category::Plain.policy().extra_build_flags.is_empty());
    }

    #[test]
    fn test_permitted_includes_cover_the_standard_containers() {
        assert!(PERMITTED_INCLUDES.contains(&"vector"));
        assert!(PERMITTED_INCLUDES.contains(&"unordered_map"));
        assert!(!PERMITTED_INCLUDES.contains(&"cstdio"));
    }
}
