//! Suggestion assembler
//!
//! Merges the deterministic organizational rules (self, direct supervisor,
//! direct reports) with embedding-derived peer suggestions into one ordered
//! list per employee. The cap governs the supervisor/report/peer steps
//! collectively; the leading self-evaluation entry rides above it.

use crate::roster::{EmployeeNumber, Roster};
use crate::vector::ClusterKnnIndex;
use indexmap::IndexMap;
use ndarray::Array2;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a suggested evaluation relates the evaluator to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    SelfEvaluation,
    DirectSupervisor,
    DirectReport,
    HomologousPeer,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Relation::SelfEvaluation => "self_evaluation",
            Relation::DirectSupervisor => "direct_supervisor",
            Relation::DirectReport => "direct_report",
            Relation::HomologousPeer => "homologous_peer",
        };
        write!(f, "{}", name)
    }
}

/// One suggested evaluation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub employee_number: EmployeeNumber,
    pub relation: Relation,
}

/// Ordered suggestion lists keyed by evaluator employee number, in roster order
pub type SuggestionMap = IndexMap<EmployeeNumber, Vec<Suggestion>>;

/// Embedding-derived inputs for the soft suggestion step. Absent when the
/// roster was too small to embed; the assembler then runs hard rules only.
pub struct SoftContext<'a> {
    pub embeddings: &'a Array2<f32>,
    pub labels: &'a [usize],
    pub index: &'a ClusterKnnIndex,
}

/// Rule-based suggestion assembler
pub struct SuggestionAssembler<'a> {
    roster: &'a Roster,
    /// Maximum entries across the supervisor/report/peer steps
    cap: usize,
}

impl<'a> SuggestionAssembler<'a> {
    pub fn new(roster: &'a Roster, cap: usize) -> Self {
        Self { roster, cap }
    }

    /// Assemble the per-employee suggestion lists.
    ///
    /// Order per employee: self-evaluation, direct supervisor, direct
    /// reports in roster order, then cluster peers by ascending embedding
    /// distance. Peers are deduplicated against every already-suggested
    /// target number.
    pub fn assemble(&self, soft: Option<&SoftContext<'_>>) -> SuggestionMap {
        let mut map = SuggestionMap::default();

        for (row, record) in self.roster.iter().enumerate() {
            let mut suggestions = Vec::with_capacity(self.cap + 1);
            let mut suggested: FxHashSet<EmployeeNumber> = FxHashSet::default();

            // 1) Self-evaluation, always first, never counted against the cap.
            suggestions.push(Suggestion {
                employee_number: record.employee_number,
                relation: Relation::SelfEvaluation,
            });
            suggested.insert(record.employee_number);

            // 2) Direct supervisor.
            if let Some(supervisor) = self.roster.direct_supervisor_of(record) {
                suggestions.push(Suggestion {
                    employee_number: supervisor.employee_number,
                    relation: Relation::DirectSupervisor,
                });
                suggested.insert(supervisor.employee_number);
            }

            // 3) Direct reports, roster order, until the cap is reached.
            for report in self.roster.direct_reports_of(&record.id) {
                if suggestions.len() - 1 >= self.cap {
                    break;
                }
                suggestions.push(Suggestion {
                    employee_number: report.employee_number,
                    relation: Relation::DirectReport,
                });
                suggested.insert(report.employee_number);
            }

            // 4) Homologous peers from the same cluster.
            if let Some(soft) = soft {
                self.push_peers(row, soft, &mut suggestions, &mut suggested);
            }

            map.insert(record.employee_number, suggestions);
        }

        debug!(employees = map.len(), "assembled suggestions");
        map
    }

    fn push_peers(
        &self,
        row: usize,
        soft: &SoftContext<'_>,
        suggestions: &mut Vec<Suggestion>,
        suggested: &mut FxHashSet<EmployeeNumber>,
    ) {
        if suggestions.len() - 1 >= self.cap {
            return;
        }

        let label = soft.labels[row];
        let query: Vec<f32> = soft.embeddings.row(row).to_vec();
        let peers = match soft.index.nearest_peers(row, label, &query, self.cap + 1) {
            Ok(peers) => peers,
            Err(error) => {
                // A missing peer only narrows this employee's list.
                warn!(row, %error, "peer lookup failed, continuing with hard rules");
                return;
            }
        };

        for peer in peers {
            if suggestions.len() - 1 >= self.cap {
                break;
            }
            let Some(record) = self.roster.at(peer.row) else {
                continue;
            };
            if suggested.contains(&record.employee_number) {
                continue;
            }
            suggestions.push(Suggestion {
                employee_number: record.employee_number,
                relation: Relation::HomologousPeer,
            });
            suggested.insert(record.employee_number);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::EmployeeRecord;

    fn number(n: u32) -> EmployeeNumber {
        EmployeeNumber::new(n)
    }

    #[test]
    fn test_self_evaluation_always_first() {
        let roster = Roster::from_records(vec![EmployeeRecord::new("a", 1)]);
        let map = SuggestionAssembler::new(&roster, 3).assemble(None);

        let suggestions = map.get(&number(1)).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].relation, Relation::SelfEvaluation);
        assert_eq!(suggestions[0].employee_number, number(1));
    }

    #[test]
    fn test_hard_rules_for_pair() {
        let roster = Roster::from_records(vec![
            EmployeeRecord::new("boss", 1),
            EmployeeRecord::new("emp", 2).with_direct_supervisor("boss"),
        ]);
        let map = SuggestionAssembler::new(&roster, 3).assemble(None);

        let boss = map.get(&number(1)).unwrap();
        assert_eq!(
            boss.iter().map(|s| s.relation).collect::<Vec<_>>(),
            vec![Relation::SelfEvaluation, Relation::DirectReport]
        );
        assert_eq!(boss[1].employee_number, number(2));

        let emp = map.get(&number(2)).unwrap();
        assert_eq!(
            emp.iter().map(|s| s.relation).collect::<Vec<_>>(),
            vec![Relation::SelfEvaluation, Relation::DirectSupervisor]
        );
        assert_eq!(emp[1].employee_number, number(1));
    }

    #[test]
    fn test_cap_does_not_count_self() {
        // Supervisor plus three reports; cap 3 admits the supervisor and two
        // reports, self rides above the cap.
        let roster = Roster::from_records(vec![
            EmployeeRecord::new("e", 5).with_direct_supervisor("s"),
            EmployeeRecord::new("s", 1),
            EmployeeRecord::new("r1", 2).with_direct_supervisor("e"),
            EmployeeRecord::new("r2", 3).with_direct_supervisor("e"),
            EmployeeRecord::new("r3", 4).with_direct_supervisor("e"),
        ]);
        let map = SuggestionAssembler::new(&roster, 3).assemble(None);

        let suggestions = map.get(&number(5)).unwrap();
        assert_eq!(suggestions.len(), 4);
        assert_eq!(suggestions[0].relation, Relation::SelfEvaluation);
        assert_eq!(suggestions[1].relation, Relation::DirectSupervisor);
        assert_eq!(suggestions[2].employee_number, number(2));
        assert_eq!(suggestions[3].employee_number, number(3));
    }

    #[test]
    fn test_reports_follow_roster_order() {
        let roster = Roster::from_records(vec![
            EmployeeRecord::new("boss", 1),
            EmployeeRecord::new("late", 9).with_direct_supervisor("boss"),
            EmployeeRecord::new("early", 2).with_direct_supervisor("boss"),
        ]);
        let map = SuggestionAssembler::new(&roster, 3).assemble(None);

        let boss = map.get(&number(1)).unwrap();
        assert_eq!(boss[1].employee_number, number(9));
        assert_eq!(boss[2].employee_number, number(2));
    }

    #[test]
    fn test_self_referencing_supervisor_produces_no_self_edges() {
        let roster =
            Roster::from_records(vec![EmployeeRecord::new("a", 1).with_direct_supervisor("a")]);
        let map = SuggestionAssembler::new(&roster, 3).assemble(None);

        let suggestions = map.get(&number(1)).unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].relation, Relation::SelfEvaluation);
    }

    #[test]
    fn test_no_duplicate_target_relation_pairs() {
        // Mutual supervision: the other employee appears once as supervisor
        // and once as report, which is legal; exact duplicates are not.
        let roster = Roster::from_records(vec![
            EmployeeRecord::new("a", 1).with_direct_supervisor("b"),
            EmployeeRecord::new("b", 2).with_direct_supervisor("a"),
        ]);
        let map = SuggestionAssembler::new(&roster, 3).assemble(None);

        for suggestions in map.values() {
            let mut seen = FxHashSet::default();
            for suggestion in suggestions {
                assert!(seen.insert((suggestion.employee_number, suggestion.relation)));
            }
        }
        let a = map.get(&number(1)).unwrap();
        assert_eq!(
            a.iter().map(|s| s.relation).collect::<Vec<_>>(),
            vec![
                Relation::SelfEvaluation,
                Relation::DirectSupervisor,
                Relation::DirectReport
            ]
        );
    }

    #[test]
    fn test_relation_serde_names() {
        let json = serde_json::to_string(&Relation::HomologousPeer).unwrap();
        assert_eq!(json, "\"homologous_peer\"");
        let back: Relation = serde_json::from_str("\"direct_supervisor\"").unwrap();
        assert_eq!(back, Relation::DirectSupervisor);
    }
}
