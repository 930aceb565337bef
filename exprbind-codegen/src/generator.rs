//! The generation pass: scan, group, build, render.

use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, debug_span, info, warn};

use crate::cache::{CachedUnit, UnitCache, fingerprint};
use crate::codegen::RenderContext;
use crate::config::{GeneratorConfig, ValidationPolicy};
use crate::declaration::DeclarationRecord;
use crate::diagnostics::Diagnostic;
use crate::emitter::{MemberOutput, build_member, emit_unit, group_candidates};
use crate::enclosure::Enclosure;
use crate::error::{ConfigError, SourceError};
use crate::scanner::scan;
use crate::source::{parse_file, parse_source};
use crate::types::{CandidateDeclaration, GenerationUnit, GroupKey};

/// Units and diagnostics of one pass. Both are in group-key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationOutput {
    pub units: Vec<GenerationUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

enum Prepared {
    Cached(CachedUnit),
    Built {
        key: GroupKey,
        fingerprint: String,
        members: Vec<MemberOutput>,
    },
}

/// A configured generator. Holds no state between passes.
#[derive(Debug, Clone)]
pub struct Generator {
    config: GeneratorConfig,
    enclosure: Enclosure,
    context: RenderContext,
}

impl Generator {
    pub fn new(config: GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let enclosure = Enclosure::resolve(config.enclosure)?;
        let context = RenderContext {
            evaluator: config.evaluator_path()?,
            runtime: config.runtime_path()?,
            impl_suffix: config.impl_suffix.clone(),
        };
        Ok(Self {
            config,
            enclosure,
            context,
        })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn enclosure(&self) -> &Enclosure {
        &self.enclosure
    }

    pub fn generate(&self, records: &[DeclarationRecord]) -> GenerationOutput {
        self.run(records, None)
    }

    /// Like [`generate`](Self::generate), reusing units whose fingerprint is
    /// already cached and storing the new ones. Stale entries are pruned.
    pub fn generate_with_cache(
        &self,
        records: &[DeclarationRecord],
        cache: &mut UnitCache,
    ) -> GenerationOutput {
        self.run(records, Some(cache))
    }

    pub fn generate_source(
        &self,
        source: &str,
        root_namespace: &str,
    ) -> Result<GenerationOutput, SourceError> {
        let records = parse_source(source, root_namespace)?;
        Ok(self.generate(&records))
    }

    pub fn generate_file(
        &self,
        path: &Path,
        root_namespace: &str,
    ) -> Result<GenerationOutput, SourceError> {
        let records = parse_file(path, root_namespace)?;
        Ok(self.generate(&records))
    }

    fn run(&self, records: &[DeclarationRecord], cache: Option<&mut UnitCache>) -> GenerationOutput {
        let _span = debug_span!("generate", records = records.len()).entered();

        let candidates = scan(records, &self.config.marker);
        if candidates.is_empty() {
            warn!(marker = %self.config.marker, "no eligible declarations");
            return GenerationOutput {
                units: Vec::new(),
                diagnostics: vec![Diagnostic::no_candidates(&self.config.marker.to_string())],
            };
        }
        let candidate_count = candidates.len();

        let groups: Vec<(GroupKey, Vec<CandidateDeclaration>, String)> =
            group_candidates(candidates)
                .into_iter()
                .map(|(key, group)| {
                    // An empty fingerprint keeps the unit out of the cache.
                    let fingerprint = fingerprint(&self.config, &group).unwrap_or_else(|error| {
                        warn!(unit = %key, %error, "cannot fingerprint unit");
                        String::new()
                    });
                    (key, group, fingerprint)
                })
                .collect();

        let cached = cache.as_deref();
        let enclosure = &self.enclosure;
        let policy = self.config.validation;
        let prepared: Vec<Prepared> = groups
            .into_par_iter()
            .map(|(key, group, fingerprint)| {
                let hit = cached
                    .filter(|_| !fingerprint.is_empty())
                    .and_then(|cache| cache.get(&fingerprint));
                match hit {
                    Some(hit) => {
                        debug!(unit = %key, "reusing cached unit");
                        Prepared::Cached(hit.clone())
                    }
                    None => Prepared::Built {
                        members: build_members(&group, enclosure, policy),
                        key,
                        fingerprint,
                    },
                }
            })
            .collect();

        // Token streams are neither Send nor Sync; rendering stays on this thread.
        let mut output = GenerationOutput::default();
        let mut fresh = Vec::new();
        let mut cache_hits = 0usize;
        for prepared in prepared {
            match prepared {
                Prepared::Cached(entry) => {
                    cache_hits += 1;
                    output.units.push(entry.unit);
                    output.diagnostics.extend(entry.diagnostics);
                }
                Prepared::Built {
                    key,
                    fingerprint,
                    members,
                } => match self.render(key, members, fingerprint) {
                    Ok(entry) => {
                        output.units.push(entry.unit.clone());
                        output.diagnostics.extend(entry.diagnostics.iter().cloned());
                        fresh.push(entry);
                    }
                    Err(diagnostics) => output.diagnostics.extend(diagnostics),
                },
            }
        }

        if let Some(cache) = cache {
            let live: Vec<String> = output.units.iter().map(|u| u.fingerprint.clone()).collect();
            for entry in fresh.into_iter().filter(|e| !e.unit.fingerprint.is_empty()) {
                cache.insert(entry);
            }
            let pruned = cache.prune(live.iter().map(String::as_str));
            debug!(pruned, "pruned unit cache");
        }

        info!(
            candidates = candidate_count,
            units = output.units.len(),
            cache_hits,
            diagnostics = output.diagnostics.len(),
            "generation pass complete"
        );
        output
    }

    fn render(
        &self,
        key: GroupKey,
        outputs: Vec<MemberOutput>,
        fingerprint: String,
    ) -> Result<CachedUnit, Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();
        let mut members = Vec::with_capacity(outputs.len());
        for output in outputs {
            diagnostics.extend(output.diagnostics);
            members.push(output.member);
        }

        match emit_unit(&self.context, key.clone(), members, fingerprint) {
            Ok((unit, skipped)) => {
                diagnostics.extend(skipped);
                Ok(CachedUnit { unit, diagnostics })
            }
            Err(error) => {
                warn!(unit = %key, %error, "failed to emit unit");
                diagnostics.push(Diagnostic::emission(&key, &error));
                Err(diagnostics)
            }
        }
    }
}

/// Builds every member of a group in parallel, keeping declaration order.
fn build_members(
    group: &[CandidateDeclaration],
    enclosure: &Enclosure,
    policy: ValidationPolicy,
) -> Vec<MemberOutput> {
    group
        .par_iter()
        .map(|candidate| build_member(candidate, enclosure, policy))
        .collect()
}
