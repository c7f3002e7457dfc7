//! Access-key set compile pass.

use std::collections::HashSet;

use bt_model::{AccessKey, AccessKeySet};

use crate::diagnostic::{CompileOptions, CompileResult, Diagnostics, Issue};

pub fn compile_access_keys(set: &AccessKeySet) -> CompileResult {
    compile_access_keys_with(set, CompileOptions::default())
}

pub fn compile_access_keys_with(set: &AccessKeySet, options: CompileOptions) -> CompileResult {
    let mut out = Diagnostics::default();
    let mut reported = HashSet::new();

    for key in set.keys() {
        let name = key.key();
        if name.is_empty() {
            out.report(Issue::EmptyAccessKeyName {
                set: set.name.clone(),
            });
        } else if reported.insert(name) {
            let count = set.keys().iter().filter(|k| k.key() == name).count();
            if count > 1 {
                out.report(Issue::DuplicateAccessKey {
                    set: set.name.clone(),
                    key: name.to_string(),
                    count,
                });
            }
        }

        match key {
            AccessKey::CounterLimit {
                max_access_count, ..
            } if *max_access_count <= 0 => out.report(Issue::InvalidMaxAccessCount {
                set: set.name.clone(),
                key: name.to_string(),
                value: *max_access_count,
            }),
            AccessKey::TimeLimit { time_interval, .. } if *time_interval <= 0.0 => {
                out.report(Issue::InvalidTimeInterval {
                    set: set.name.clone(),
                    key: name.to_string(),
                    value: *time_interval,
                })
            }
            _ => {}
        }
    }

    let result = out.finish(options);
    tracing::info!(
        set = %set.name,
        keys = set.len(),
        errors = result.error_count(),
        passed = result.passed,
        "Compiled shared access keys"
    );
    result
}
