//! Choosing the desired includes of one file.
//!
//! Every need is an ordered list of public files, any one of which satisfies
//! it. Needs are settled in priority order:
//!
//! 1. the referencing file itself is a candidate
//! 2. an include of an associated header is a candidate
//! 3. a present include that is already desired, else the first present one
//! 4. an include already desired
//! 5. greedy set cover: the candidate covering most open needs, earliest first
//!
//! A final pass drops any chosen include whose needs are all covered by the
//! remaining ones, so no chosen include is redundant.

use indexmap::{IndexMap, IndexSet};

use crate::base::IncludeName;

/// How one need was satisfied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Assignment {
    /// The referencing file provides it.
    SelfFile,
    /// Already included by an associated header.
    Associated(IncludeName),
    Include(IncludeName),
}

/// Facts about the referencing file.
#[derive(Clone, Copy, Debug)]
pub struct CoverInput<'a> {
    pub referencing: &'a IncludeName,
    pub present: &'a IndexSet<IncludeName>,
    pub associated_includes: &'a IndexSet<IncludeName>,
}

/// Chosen includes and one assignment per need (`None` for needs without
/// candidates).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Cover {
    pub desired: IndexSet<IncludeName>,
    pub assignments: Vec<Option<Assignment>>,
}

pub fn choose_includes(needs: &[Vec<IncludeName>], input: CoverInput<'_>) -> Cover {
    let mut assignments: Vec<Option<Assignment>> = vec![None; needs.len()];
    let mut desired: IndexSet<IncludeName> = IndexSet::new();

    for (need, slot) in needs.iter().zip(assignments.iter_mut()) {
        if need.contains(input.referencing) {
            *slot = Some(Assignment::SelfFile);
        } else if let Some(file) = need.iter().find(|c| input.associated_includes.contains(*c)) {
            *slot = Some(Assignment::Associated(file.clone()));
        }
    }

    for (need, slot) in needs.iter().zip(assignments.iter_mut()) {
        if slot.is_some() {
            continue;
        }
        let present: Vec<&IncludeName> = need.iter().filter(|c| input.present.contains(*c)).collect();
        let pick = present
            .iter()
            .find(|c| desired.contains(**c))
            .or_else(|| present.first())
            .map(|c| (*c).clone());
        if let Some(pick) = pick {
            desired.insert(pick.clone());
            *slot = Some(Assignment::Include(pick));
        }
    }

    loop {
        for (need, slot) in needs.iter().zip(assignments.iter_mut()) {
            if slot.is_none() {
                if let Some(file) = need.iter().find(|c| desired.contains(*c)) {
                    *slot = Some(Assignment::Include(file.clone()));
                }
            }
        }

        let mut coverage: IndexMap<&IncludeName, usize> = IndexMap::new();
        for (need, slot) in needs.iter().zip(&assignments) {
            if slot.is_some() {
                continue;
            }
            let mut counted: IndexSet<&IncludeName> = IndexSet::new();
            for candidate in need {
                if counted.insert(candidate) {
                    *coverage.entry(candidate).or_default() += 1;
                }
            }
        }
        let mut best: Option<(&IncludeName, usize)> = None;
        for (file, count) in coverage {
            if best.is_none_or(|(_, best_count)| count > best_count) {
                best = Some((file, count));
            }
        }
        match best {
            Some((file, _)) => {
                desired.insert(file.clone());
            }
            None => break,
        }
    }

    prune(needs, &mut desired, &mut assignments);
    Cover {
        desired,
        assignments,
    }
}

fn prune(
    needs: &[Vec<IncludeName>],
    desired: &mut IndexSet<IncludeName>,
    assignments: &mut [Option<Assignment>],
) {
    let chosen: Vec<IncludeName> = desired.iter().cloned().collect();
    for file in chosen.iter().rev() {
        let dependents: Vec<usize> = assignments
            .iter()
            .enumerate()
            .filter(|(_, slot)| matches!(slot, Some(Assignment::Include(f)) if f == file))
            .map(|(idx, _)| idx)
            .collect();
        let replacements: Option<Vec<IncludeName>> = dependents
            .iter()
            .map(|&idx| {
                needs[idx]
                    .iter()
                    .find(|c| *c != file && desired.contains(*c))
                    .cloned()
            })
            .collect();
        if let Some(replacements) = replacements {
            desired.shift_remove(file);
            for (idx, replacement) in dependents.into_iter().zip(replacements) {
                assignments[idx] = Some(Assignment::Include(replacement));
            }
        }
    }
}
