use fxhash::{FxHashMap, FxHashSet};
use splitledger_application::{GroupId, GroupSnapshot, LedgerSource, LedgerSourceError};
use splitledger_domain::{ExpenseRecord, MemberId, Money, SettlementRecord, SplitRule};
use splitledger_parser::{
    Entry, EntryWithLine, Expense, Ledger, ParseError, Settlement, SplitTerms, parse_ledger,
};

/// Groups stored as plain-text ledger documents, parsed on every load.
#[derive(Default)]
pub struct TextLedgerSource {
    documents: FxHashMap<GroupId, String>,
}

impl TextLedgerSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(mut self, group: impl Into<GroupId>, content: impl Into<String>) -> Self {
        self.insert(group, content);
        self
    }

    pub fn insert(&mut self, group: impl Into<GroupId>, content: impl Into<String>) {
        self.documents.insert(group.into(), content.into());
    }
}

impl LedgerSource for TextLedgerSource {
    fn load_group(&self, group: &GroupId) -> Result<GroupSnapshot, LedgerSourceError> {
        let content = self
            .documents
            .get(group)
            .ok_or_else(|| LedgerSourceError::GroupNotFound(group.clone()))?;

        let snapshot = snapshot_from_text(content).inspect_err(|err| {
            tracing::warn!(group = %group, reject_reason = %err, "Rejected ledger document");
        })?;

        tracing::debug!(
            group = %group,
            member_count = snapshot.members.len(),
            expense_count = snapshot.expenses.len(),
            settlement_count = snapshot.settlements.len(),
            "Loaded ledger document"
        );
        Ok(snapshot)
    }
}

/// Parses one ledger document into a group snapshot.
///
/// Every name used by an entry must appear in the members declaration, and
/// every expense must describe a valid split.
pub fn snapshot_from_text(content: &str) -> Result<GroupSnapshot, LedgerSourceError> {
    let Ledger { members, entries } = parse_ledger(content).map_err(to_source_error)?;
    let roster = Roster::new(&members);

    let mut expenses = Vec::new();
    let mut settlements = Vec::new();

    for EntryWithLine { line, entry } in entries {
        match entry {
            Entry::Expense(expense) => expenses.push(to_expense(&roster, line, expense)?),
            Entry::Settlement(settlement) => {
                settlements.push(to_settlement(&roster, line, settlement)?)
            }
        }
    }

    Ok(GroupSnapshot::new(
        members.into_iter().map(MemberId::from).collect(),
        expenses,
        settlements,
    ))
}

struct Roster<'a> {
    declared: FxHashSet<&'a str>,
}

impl<'a> Roster<'a> {
    fn new(members: &[&'a str]) -> Self {
        Self {
            declared: members.iter().copied().collect(),
        }
    }

    fn resolve(&self, name: &str, line: usize) -> Result<MemberId, LedgerSourceError> {
        if self.declared.contains(name) {
            Ok(MemberId::from(name))
        } else {
            Err(LedgerSourceError::UndefinedMember {
                name: name.to_string(),
                line,
            })
        }
    }
}

fn to_expense(
    roster: &Roster<'_>,
    line: usize,
    expense: Expense<'_>,
) -> Result<ExpenseRecord, LedgerSourceError> {
    let Expense {
        payer,
        amount,
        split,
    } = expense;
    let payer = roster.resolve(payer, line)?;

    let rule = match split {
        SplitTerms::Equal(names) => SplitRule::Equal(
            names
                .into_iter()
                .map(|name| roster.resolve(name, line))
                .collect::<Result<_, _>>()?,
        ),
        SplitTerms::Exact(shares) => SplitRule::Exact(
            shares
                .into_iter()
                .map(|(name, share)| {
                    Ok((roster.resolve(name, line)?, Money::from_decimal(share)))
                })
                .collect::<Result<_, LedgerSourceError>>()?,
        ),
        SplitTerms::Percentage(shares) => SplitRule::Percentage(
            shares
                .into_iter()
                .map(|(name, pct)| Ok((roster.resolve(name, line)?, pct)))
                .collect::<Result<_, LedgerSourceError>>()?,
        ),
    };

    ExpenseRecord::from_split(payer, Money::from_decimal(amount), rule)
        .map_err(|source| LedgerSourceError::InvalidSplit { line, source })
}

fn to_settlement(
    roster: &Roster<'_>,
    line: usize,
    settlement: Settlement<'_>,
) -> Result<SettlementRecord, LedgerSourceError> {
    let payer = roster.resolve(settlement.payer, line)?;
    let payee = roster.resolve(settlement.payee, line)?;
    let amount = Money::from_decimal(settlement.amount);

    if !amount.is_positive() {
        return Err(LedgerSourceError::Malformed {
            line,
            detail: format!("settlement amount must be positive, got {amount}"),
        });
    }
    Ok(SettlementRecord::new(payer, payee, amount))
}

fn to_source_error(err: ParseError) -> LedgerSourceError {
    match err {
        ParseError::MissingMembersDeclaration => LedgerSourceError::MissingMembersDeclaration,
        ParseError::DuplicateMembersDeclaration { line } => LedgerSourceError::Malformed {
            line,
            detail: "members are already declared".to_string(),
        },
        ParseError::SyntaxError { line, detail } => LedgerSourceError::Malformed { line, detail },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use splitledger_domain::{Participant, SplitError};

    const DOCUMENT: &str = "\
members := alice bob carol
alice paid 90 for alice bob carol          // equal split
bob paid 100.50 for alice 60.50, carol 40  // exact split
carol paid 80 for alice 25%, carol 75%     // percentage split
bob settled 20 to alice
";

    fn ids(names: &[&str]) -> Vec<MemberId> {
        names.iter().copied().map(MemberId::from).collect()
    }

    #[test]
    fn builds_records_for_every_entry_form() {
        let snapshot = snapshot_from_text(DOCUMENT).expect("document should load");

        assert_eq!(snapshot.members, ids(&["alice", "bob", "carol"]));
        assert_eq!(
            snapshot.expenses,
            vec![
                ExpenseRecord::new(
                    "alice",
                    Money::from_i64(90),
                    [
                        Participant::new("alice", Money::from_i64(30)),
                        Participant::new("bob", Money::from_i64(30)),
                        Participant::new("carol", Money::from_i64(30)),
                    ],
                ),
                ExpenseRecord::new(
                    "bob",
                    Money::new(10050, 2),
                    [
                        Participant::new("alice", Money::new(6050, 2)),
                        Participant::new("carol", Money::from_i64(40)),
                    ],
                ),
                ExpenseRecord::new(
                    "carol",
                    Money::from_i64(80),
                    [
                        Participant::new("alice", Money::from_i64(20)),
                        Participant::new("carol", Money::from_i64(60)),
                    ],
                ),
            ]
        );
        assert_eq!(
            snapshot.settlements,
            vec![SettlementRecord::new("bob", "alice", Money::from_i64(20))]
        );
    }

    #[rstest]
    #[case::unknown_payer(
        "members := a b\nz paid 10 for a b",
        LedgerSourceError::UndefinedMember { name: "z".to_string(), line: 2 }
    )]
    #[case::unknown_participant(
        "members := a b\na paid 10 for a b\nb paid 10 for a 5, q 5",
        LedgerSourceError::UndefinedMember { name: "q".to_string(), line: 3 }
    )]
    #[case::unknown_payee(
        "members := a b\na settled 5 to c",
        LedgerSourceError::UndefinedMember { name: "c".to_string(), line: 2 }
    )]
    #[case::missing_members("a paid 10 for a", LedgerSourceError::MissingMembersDeclaration)]
    #[case::duplicate_members(
        "members := a\nmembers := a",
        LedgerSourceError::Malformed {
            line: 2,
            detail: "members are already declared".to_string(),
        }
    )]
    #[case::zero_settlement(
        "members := a b\na settled 0 to b",
        LedgerSourceError::Malformed {
            line: 2,
            detail: "settlement amount must be positive, got 0.00".to_string(),
        }
    )]
    #[case::shares_mismatch(
        "members := a b\na paid 10 for a 4, b 4",
        LedgerSourceError::InvalidSplit {
            line: 2,
            source: SplitError::SharesMismatch {
                expected: Money::from_i64(10),
                actual: Money::from_i64(8),
            },
        }
    )]
    #[case::zero_expense(
        "members := a b\na paid 0 for a b",
        LedgerSourceError::InvalidSplit {
            line: 2,
            source: SplitError::NonPositiveAmount(Money::ZERO),
        }
    )]
    #[case::percentages_over_hundred(
        "members := a b\na paid 1000 for a 0%, b 100.01%",
        LedgerSourceError::InvalidSplit {
            line: 2,
            source: SplitError::PercentagesMismatch {
                total: "100.01".parse().expect("decimal"),
            },
        }
    )]
    fn rejects_invalid_documents(#[case] content: &str, #[case] expected: LedgerSourceError) {
        assert_eq!(snapshot_from_text(content), Err(expected));
    }

    #[test]
    fn syntax_errors_keep_their_line() {
        let result = snapshot_from_text("members := a b\n\na lent 10 to b");
        assert!(matches!(
            result,
            Err(LedgerSourceError::Malformed { line: 3, .. })
        ));
    }

    #[test]
    fn source_looks_up_documents_by_group() {
        let source = TextLedgerSource::new().with_document("trip", DOCUMENT);

        let snapshot = source.load_group(&GroupId::from("trip")).expect("trip");
        assert_eq!(snapshot.expenses.len(), 3);
        assert_eq!(
            source.load_group(&GroupId::from("home")),
            Err(LedgerSourceError::GroupNotFound(GroupId::from("home")))
        );
    }
}
