use crate::config::types::MappingConfig;
use crate::model::StreamGroupId;
use std::collections::HashMap;
use thiserror::Error;

/// Built-in workload table: (category, name, log group)
const DEFAULT_MAPPINGS: &[(&str, &str, &str)] = &[
    // scrapers and crawlers
    ("scrapers", "eTenderLambda", "/aws/lambda/eTendersLambda"),
    ("scrapers", "EskomLambda", "/aws/lambda/EskomLambda"),
    ("scrapers", "TransnetLambda", "/aws/lambda/TransnetLambda"),
    ("scrapers", "SanralLambda", "/aws/lambda/SanralFunction"),
    ("scrapers", "SarsLambda", "/aws/lambda/SarsLambda"),
    // data pipeline
    ("pipeline", "DeduplicationLambda", "/aws/lambda/TenderDeduplicationLambda"),
    ("pipeline", "AISummaryLambda", "/aws/lambda/AILambda"),
    ("pipeline", "AITaggingLambda", "/aws/lambda/TenderAITaggingLambda"),
    ("pipeline", "DBWriterLambda", "/aws/lambda/TenderDatabaseWriterLambda"),
    ("pipeline", "TenderCleanupLambda", "/aws/lambda/TenderCleanupHandler"),
];

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("duplicate mapping for '{category}' -> '{name}'")]
    Duplicate { category: String, name: String },

    #[error("mapping for '{category}' -> '{name}' has an empty log group")]
    EmptyGroup { category: String, name: String },
}

/// Case-folded (category, name) lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolutionKey {
    category: String,
    name: String,
}

impl ResolutionKey {
    pub fn new(category: &str, name: &str) -> Self {
        Self {
            category: category.to_lowercase(),
            name: name.to_lowercase(),
        }
    }
}

/// One row of the mapping table, with names as originally written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub category: String,
    pub name: String,
    pub group: StreamGroupId,
}

/// Maps friendly (category, name) pairs to log groups.
///
/// The table is built once and never modified, so a resolver can be shared
/// across requests behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct NameResolver {
    mappings: Vec<Mapping>,
    index: HashMap<ResolutionKey, usize>,
}

impl NameResolver {
    pub fn new<I>(mappings: I) -> Result<Self, ResolverError>
    where
        I: IntoIterator<Item = Mapping>,
    {
        let mut resolver = Self {
            mappings: Vec::new(),
            index: HashMap::new(),
        };

        for mapping in mappings {
            if mapping.group.as_str().trim().is_empty() {
                return Err(ResolverError::EmptyGroup {
                    category: mapping.category,
                    name: mapping.name,
                });
            }

            let key = ResolutionKey::new(&mapping.category, &mapping.name);
            if resolver.index.contains_key(&key) {
                return Err(ResolverError::Duplicate {
                    category: mapping.category,
                    name: mapping.name,
                });
            }

            resolver.index.insert(key, resolver.mappings.len());
            resolver.mappings.push(mapping);
        }

        Ok(resolver)
    }

    /// Resolver over the built-in workload table
    pub fn with_defaults() -> Self {
        let mappings = DEFAULT_MAPPINGS.iter().map(|(category, name, group)| Mapping {
            category: category.to_string(),
            name: name.to_string(),
            group: StreamGroupId::new(*group),
        });

        Self::new(mappings).expect("built-in mapping table is valid")
    }

    /// Use the configured table if one is given, otherwise the built-in one
    pub fn from_config(mappings: Option<&[MappingConfig]>) -> Result<Self, ResolverError> {
        match mappings {
            Some(mappings) => Self::new(mappings.iter().map(|m| Mapping {
                category: m.category.clone(),
                name: m.name.clone(),
                group: StreamGroupId::new(m.group.clone()),
            })),
            None => Ok(Self::with_defaults()),
        }
    }

    /// Look up the log group for a pair, ignoring case in both fields.
    /// A miss is logged and returned as `None`.
    pub fn resolve(&self, category: &str, name: &str) -> Option<StreamGroupId> {
        let key = ResolutionKey::new(category, name);
        match self.index.get(&key) {
            Some(&idx) => Some(self.mappings[idx].group.clone()),
            None => {
                tracing::warn!(
                    category = %category,
                    name = %name,
                    "No log group mapping found"
                );
                None
            }
        }
    }

    pub fn entries(&self) -> &[Mapping] {
        &self.mappings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_ignores_case_in_both_fields() {
        let resolver = NameResolver::with_defaults();

        let upper = resolver.resolve("SCRAPERS", "etenderlambda");
        let mixed = resolver.resolve("scrapers", "eTenderLambda");

        assert_eq!(upper, mixed);
        assert_eq!(upper.unwrap().as_str(), "/aws/lambda/eTendersLambda");
    }

    #[test]
    fn test_resolve_unknown_pair_is_none() {
        let resolver = NameResolver::with_defaults();
        assert!(resolver.resolve("unknown", "x").is_none());
        // right name, wrong category
        assert!(resolver.resolve("pipeline", "EskomLambda").is_none());
    }

    #[test]
    fn test_every_default_mapping_resolves() {
        let resolver = NameResolver::with_defaults();
        assert_eq!(resolver.entries().len(), DEFAULT_MAPPINGS.len());

        for (category, name, group) in DEFAULT_MAPPINGS {
            let resolved = resolver.resolve(category, name).unwrap();
            assert_eq!(resolved.as_str(), *group);
        }
    }

    #[test]
    fn test_duplicate_after_case_folding_is_rejected() {
        let result = NameResolver::new(vec![
            Mapping {
                category: "jobs".into(),
                name: "Nightly".into(),
                group: StreamGroupId::new("/a"),
            },
            Mapping {
                category: "JOBS".into(),
                name: "nightly".into(),
                group: StreamGroupId::new("/b"),
            },
        ]);

        assert!(matches!(result, Err(ResolverError::Duplicate { .. })));
    }

    #[test]
    fn test_configured_table_replaces_defaults() {
        let configured = vec![MappingConfig {
            category: "jobs".into(),
            name: "Nightly".into(),
            group: "/ecs/nightly".into(),
        }];

        let resolver = NameResolver::from_config(Some(&configured)).unwrap();

        assert_eq!(resolver.resolve("Jobs", "NIGHTLY").unwrap().as_str(), "/ecs/nightly");
        assert!(resolver.resolve("scrapers", "EskomLambda").is_none());
    }

    #[test]
    fn test_empty_group_is_rejected() {
        let result = NameResolver::new(vec![Mapping {
            category: "jobs".into(),
            name: "Nightly".into(),
            group: StreamGroupId::new("  "),
        }]);

        assert!(matches!(result, Err(ResolverError::EmptyGroup { .. })));
    }
}
