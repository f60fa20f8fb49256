//! Diff desired records against the provider's current records.

use dnspin_core::{name_key, DesiredState, ExistingRecord, Operation, Plan, RecordType};
use std::collections::HashSet;
use tracing::debug;

/// Compute the operations that bring `current` in line with `desired`.
///
/// Names are matched case-insensitively, ignoring a trailing dot; content
/// is compared byte for byte. See [`plan_with_key`] for the ordering
/// guarantees.
#[must_use]
pub fn plan(desired: &[DesiredState], current: &[ExistingRecord]) -> Plan {
    plan_with_key(desired, current, name_key)
}

/// Like [`plan`], matching names through `key`.
///
/// For every desired entry, current records of the same type whose key
/// matches are considered in provider order:
///
/// - `Present` with no match creates; a first match with the same content
///   is a no-op, with different content an update.
/// - Matches after the first are deleted, leaving at most one record per
///   name and type.
/// - `Absent` deletes every match.
///
/// The plan lists standalone deletes first, then creates and updates in
/// desired order, then no-ops. Current records at names that are not
/// desired are left untouched. Repeated desired entries for the same name
/// and type are ignored after the first.
pub fn plan_with_key<F>(desired: &[DesiredState], current: &[ExistingRecord], key: F) -> Plan
where
    F: Fn(&str) -> String,
{
    let mut deletes = Vec::new();
    let mut changes = Vec::new();
    let mut unchanged = Vec::new();
    let mut planned: HashSet<(String, RecordType)> = HashSet::new();

    for entry in desired {
        let wanted = key(entry.name());
        if !planned.insert((wanted.clone(), entry.record_type())) {
            debug!(name = entry.name(), "ignoring repeated desired entry");
            continue;
        }

        let mut matches = current
            .iter()
            .filter(|r| r.record_type == entry.record_type() && key(&r.name) == wanted);

        if let DesiredState::Present(record) = entry {
            match matches.next() {
                None => changes.push(Operation::Create(record.clone())),
                Some(existing) if existing.content == record.content => {
                    unchanged.push(Operation::NoOp {
                        name: record.name.clone(),
                    });
                }
                Some(existing) => changes.push(Operation::Update {
                    id: existing.id.clone(),
                    record: record.clone(),
                }),
            }
        }

        // Whatever is left is either a duplicate or unwanted.
        for extra in matches {
            deletes.push(Operation::Delete {
                id: extra.id.clone(),
                name: extra.name.clone(),
            });
        }
    }

    debug!(
        deletes = deletes.len(),
        changes = changes.len(),
        unchanged = unchanged.len(),
        "plan computed"
    );

    deletes.into_iter().chain(changes).chain(unchanged).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnspin_core::DesiredRecord;

    const N: &str = "_443._tcp.example.com";

    fn tlsa(name: &str, content: &str) -> DesiredState {
        DesiredRecord::new(name, RecordType::Tlsa, content).into()
    }

    fn existing(id: &str, name: &str, record_type: RecordType, content: &str) -> ExistingRecord {
        ExistingRecord {
            id: id.into(),
            name: name.into(),
            record_type,
            content: content.into(),
        }
    }

    #[test]
    fn test_empty_current_creates_everything() {
        let content = format!("3 1 1 {}", "a".repeat(64));
        let desired = [tlsa(N, &content)];
        let plan = plan(&desired, &[]);
        assert_eq!(
            plan.0,
            vec![Operation::Create(DesiredRecord::new(N, RecordType::Tlsa, content))]
        );
    }

    #[test]
    fn test_changed_content_updates() {
        let desired = [tlsa(N, "3 1 1 xx")];
        let current = [existing("1", N, RecordType::Tlsa, "3 1 1 yy")];
        let plan = plan(&desired, &current);
        assert_eq!(
            plan.0,
            vec![Operation::Update {
                id: "1".into(),
                record: DesiredRecord::new(N, RecordType::Tlsa, "3 1 1 xx"),
            }]
        );
    }

    #[test]
    fn test_same_content_is_noop() {
        let desired = [tlsa(N, "3 1 1 xx")];
        let current = [existing("1", N, RecordType::Tlsa, "3 1 1 xx")];
        assert_eq!(plan(&desired, &current).0, vec![Operation::NoOp { name: N.into() }]);
    }

    #[test]
    fn test_names_match_case_insensitively_content_does_not() {
        let desired = [tlsa(N, "3 1 1 ab")];
        let current = [existing("1", "_443._TCP.Example.com.", RecordType::Tlsa, "3 1 1 AB")];
        let plan = plan(&desired, &current);
        assert!(matches!(plan.0.as_slice(), [Operation::Update { id, .. }] if id == "1"));
    }

    #[test]
    fn test_absent_deletes_without_create() {
        let name = "_smtp._tls.example.com";
        let desired = [DesiredState::absent(name, RecordType::Txt)];
        let current = [existing("t1", name, RecordType::Txt, "v=TLSRPTv1; rua=mailto:old@example.com")];
        assert_eq!(
            plan(&desired, &current).0,
            vec![Operation::Delete {
                id: "t1".into(),
                name: name.into(),
            }]
        );
    }

    #[test]
    fn test_absent_with_nothing_to_delete_is_empty() {
        let desired = [DesiredState::absent("_smtp._tls.example.com", RecordType::Txt)];
        assert!(plan(&desired, &[]).is_empty());
    }

    #[test]
    fn test_duplicates_are_deleted_first_is_authoritative() {
        let desired = [tlsa(N, "3 1 1 new")];
        let current = [
            existing("1", N, RecordType::Tlsa, "3 1 1 old"),
            existing("2", N, RecordType::Tlsa, "3 1 1 older"),
        ];
        let plan = plan(&desired, &current);
        assert_eq!(
            plan.0,
            vec![
                Operation::Delete {
                    id: "2".into(),
                    name: N.into(),
                },
                Operation::Update {
                    id: "1".into(),
                    record: DesiredRecord::new(N, RecordType::Tlsa, "3 1 1 new"),
                },
            ]
        );
    }

    #[test]
    fn test_other_types_and_names_are_untouched() {
        let desired = [tlsa(N, "3 1 1 xx")];
        let current = [
            existing("txt", N, RecordType::Txt, "unrelated"),
            existing("other", "_25._tcp.example.com", RecordType::Tlsa, "3 1 1 zz"),
            existing("1", N, RecordType::Tlsa, "3 1 1 xx"),
        ];
        assert_eq!(plan(&desired, &current).0, vec![Operation::NoOp { name: N.into() }]);
    }

    #[test]
    fn test_ordering_deletes_changes_noops() {
        let desired = [
            tlsa("_25._tcp.example.com", "3 1 1 same"),
            tlsa("_465._tcp.example.com", "3 1 1 new"),
            tlsa("_587._tcp.example.com", "3 1 1 new"),
            DesiredState::absent("_smtp._tls.example.com", RecordType::Txt),
        ];
        let current = [
            existing("a", "_25._tcp.example.com", RecordType::Tlsa, "3 1 1 same"),
            existing("b", "_465._tcp.example.com", RecordType::Tlsa, "3 1 1 old"),
            existing("c", "_smtp._tls.example.com", RecordType::Txt, "v=TLSRPTv1; rua=mailto:x@y"),
        ];

        let plan = plan(&desired, &current);
        let actions: Vec<(&str, &str)> = plan.iter().map(|op| (op.action(), op.name())).collect();
        assert_eq!(
            actions,
            [
                ("delete", "_smtp._tls.example.com"),
                ("update", "_465._tcp.example.com"),
                ("create", "_587._tcp.example.com"),
                ("unchanged", "_25._tcp.example.com"),
            ]
        );
    }

    #[test]
    fn test_repeated_desired_entries_plan_once() {
        let desired = [tlsa(N, "3 1 1 xx"), tlsa(&N.to_uppercase(), "3 1 1 yy")];
        let plan = plan(&desired, &[]);
        assert_eq!(plan.len(), 1);
        assert!(matches!(&plan.0[0], Operation::Create(r) if r.content == "3 1 1 xx"));
    }

    #[test]
    fn test_custom_key() {
        let desired = [tlsa("a.example.com", "x")];
        let current = [existing("1", "A.EXAMPLE.COM", RecordType::Tlsa, "x")];
        let exact = plan_with_key(&desired, &current, str::to_string);
        assert!(matches!(exact.0.as_slice(), [Operation::Create(_)]));
    }
}
