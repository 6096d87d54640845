#![warn(clippy::uninlined_format_args)]

//! Parser for plain-text group ledgers.
//!
//! ```text
//! members := alice bob carol
//! alice paid 90 for alice bob carol          // equal split
//! bob paid 100.50 for alice 60.50, carol 40  // exact shares
//! carol paid 80 for alice 25%, carol 75%     // percentages
//! bob settled 20 to alice
//! ```
//!
//! One statement per line. Whitespace, `/* ... */` and `// ...` comments are
//! ignored. The parser is purely syntactic: it does not check that names are
//! declared members or that shares add up.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, tag_no_case, take_till, take_until, take_while},
    character::complete::{char, digit1, multispace1, satisfy},
    combinator::{map_res, opt, recognize},
    multi::{many0, many1, separated_list1},
    sequence::delimited,
};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum SplitTerms<'a> {
    Equal(Vec<&'a str>),
    Exact(Vec<(&'a str, Decimal)>),
    Percentage(Vec<(&'a str, Decimal)>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense<'a> {
    pub payer: &'a str,
    pub amount: Decimal,
    pub split: SplitTerms<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settlement<'a> {
    pub payer: &'a str,
    pub payee: &'a str,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry<'a> {
    Expense(Expense<'a>),
    Settlement(Settlement<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntryWithLine<'a> {
    pub line: usize,
    pub entry: Entry<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ledger<'a> {
    pub members: Vec<&'a str>,
    pub entries: Vec<EntryWithLine<'a>>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("Ledger is missing a `members := ...` declaration")]
    MissingMembersDeclaration,
    #[error("Members are declared a second time at line {line}")]
    DuplicateMembersDeclaration { line: usize },
    #[error("Syntax error at line {line}: {detail}")]
    SyntaxError { line: usize, detail: String },
}

enum Statement<'a> {
    Members(Vec<&'a str>),
    Entry(Entry<'a>),
}

fn sp(input: &str) -> IResult<&str, &str> {
    fn block_comment(input: &str) -> IResult<&str, &str> {
        delimited(tag("/*"), take_until("*/"), tag("*/")).parse(input)
    }

    fn line_comment(input: &str) -> IResult<&str, &str> {
        recognize((tag("//"), take_till(|c: char| c == '\n'))).parse(input)
    }

    recognize(many0(alt((multispace1, block_comment, line_comment)))).parse(input)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize((
        satisfy(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '-'),
    ))
    .parse(input)
}

fn amount(input: &str) -> IResult<&str, Decimal> {
    map_res(
        recognize((digit1, opt((char('.'), digit1)))),
        Decimal::from_str_exact,
    )
    .parse(input)
}

fn list_separator(input: &str) -> IResult<&str, char> {
    (sp, char(','), sp).map(|(_, comma, _)| comma).parse(input)
}

// alice bob, carol
fn name_list(input: &str) -> IResult<&str, Vec<&str>> {
    many1((identifier, sp, opt((char(','), sp))).map(|(name, _, _)| name)).parse(input)
}

// alice 60.50, carol 40
fn exact_shares(input: &str) -> IResult<&str, Vec<(&str, Decimal)>> {
    separated_list1(
        list_separator,
        (identifier, sp, amount).map(|(name, _, share)| (name, share)),
    )
    .parse(input)
}

// alice 25%, carol 75%
fn percentage_shares(input: &str) -> IResult<&str, Vec<(&str, Decimal)>> {
    separated_list1(
        list_separator,
        (identifier, sp, amount, sp, char('%')).map(|(name, _, pct, _, _)| (name, pct)),
    )
    .parse(input)
}

fn split_terms(input: &str) -> IResult<&str, SplitTerms<'_>> {
    alt((
        percentage_shares.map(SplitTerms::Percentage),
        exact_shares.map(SplitTerms::Exact),
        name_list.map(SplitTerms::Equal),
    ))
    .parse(input)
}

fn members_declaration(input: &str) -> IResult<&str, Vec<&str>> {
    (tag_no_case("members"), sp, tag(":="), sp, name_list)
        .map(|(_, _, _, _, members)| members)
        .parse(input)
}

// {payer} paid {amount} for {split}
fn expense(input: &str) -> IResult<&str, Expense<'_>> {
    (
        identifier,
        sp,
        tag_no_case("paid"),
        sp,
        amount,
        sp,
        tag_no_case("for"),
        sp,
        split_terms,
    )
        .map(|(payer, _, _, _, amount, _, _, _, split)| Expense {
            payer,
            amount,
            split,
        })
        .parse(input)
}

// {payer} settled {amount} to {payee}
fn settlement(input: &str) -> IResult<&str, Settlement<'_>> {
    (
        identifier,
        sp,
        tag_no_case("settled"),
        sp,
        amount,
        sp,
        tag_no_case("to"),
        sp,
        identifier,
    )
        .map(|(payer, _, _, _, amount, _, _, _, payee)| Settlement {
            payer,
            payee,
            amount,
        })
        .parse(input)
}

fn statement(input: &str) -> IResult<&str, Statement<'_>> {
    alt((
        members_declaration.map(Statement::Members),
        expense.map(|expense| Statement::Entry(Entry::Expense(expense))),
        settlement.map(|settlement| Statement::Entry(Entry::Settlement(settlement))),
    ))
    .parse(input)
}

fn statement_with_sp(input: &str) -> IResult<&str, Statement<'_>> {
    (sp, statement, sp).map(|(_, stmt, _)| stmt).parse(input)
}

pub fn parse_ledger(input: &str) -> Result<Ledger<'_>, ParseError> {
    let mut members: Option<Vec<&str>> = None;
    let mut entries = Vec::new();

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let (rest, _) = sp(line).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: e.to_string(),
        })?;
        if rest.trim().is_empty() {
            continue;
        }

        let (rest, stmt) = statement_with_sp(rest).map_err(|e| ParseError::SyntaxError {
            line: line_no,
            detail: e.to_string(),
        })?;
        if !rest.trim().is_empty() {
            return Err(ParseError::SyntaxError {
                line: line_no,
                detail: format!("unparsed input: {}", rest.trim()),
            });
        }

        match stmt {
            Statement::Members(declared) => {
                if members.is_some() {
                    return Err(ParseError::DuplicateMembersDeclaration { line: line_no });
                }
                members = Some(declared);
            }
            Statement::Entry(entry) => entries.push(EntryWithLine {
                line: line_no,
                entry,
            }),
        }
    }

    let members = members.ok_or(ParseError::MissingMembersDeclaration)?;
    Ok(Ledger { members, entries })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn dec(num: i64, scale: u32) -> Decimal {
        Decimal::new(num, scale)
    }

    fn single_entry(input: &str) -> Entry<'_> {
        let (rest, stmt) = statement(input).expect("statement should parse");
        assert!(rest.trim().is_empty(), "unparsed: {rest}");
        match stmt {
            Statement::Entry(entry) => entry,
            Statement::Members(_) => panic!("expected an entry"),
        }
    }

    #[rstest]
    #[case::integer("90", dec(90, 0))]
    #[case::cents("100.50", dec(10050, 2))]
    #[case::single_digit_fraction("3.5", dec(35, 1))]
    fn test_amount(#[case] input: &str, #[case] expected: Decimal) {
        let (_, value) = amount(input).unwrap();
        assert_eq!(value, expected);
    }

    #[rstest]
    #[case::spaces("members := alice bob carol", &["alice", "bob", "carol"])]
    #[case::commas("MEMBERS := alice, bob,carol", &["alice", "bob", "carol"])]
    #[case::single("members:=alice", &["alice"])]
    fn test_members_declaration(#[case] input: &str, #[case] expected: &[&str]) {
        let (_, members) = members_declaration(input).unwrap();
        assert_eq!(members, expected);
    }

    #[rstest]
    #[case::equal(
        "alice paid 90 for alice bob carol",
        Entry::Expense(Expense {
            payer: "alice",
            amount: dec(90, 0),
            split: SplitTerms::Equal(vec!["alice", "bob", "carol"]),
        })
    )]
    #[case::exact(
        "bob paid 100.50 for alice 60.50, carol 40",
        Entry::Expense(Expense {
            payer: "bob",
            amount: dec(10050, 2),
            split: SplitTerms::Exact(vec![("alice", dec(6050, 2)), ("carol", dec(40, 0))]),
        })
    )]
    #[case::percentage(
        "carol PAID 80 FOR alice 25%, carol 75 %",
        Entry::Expense(Expense {
            payer: "carol",
            amount: dec(80, 0),
            split: SplitTerms::Percentage(vec![("alice", dec(25, 0)), ("carol", dec(75, 0))]),
        })
    )]
    #[case::settlement(
        "bob settled 20 to alice",
        Entry::Settlement(Settlement {
            payer: "bob",
            payee: "alice",
            amount: dec(20, 0),
        })
    )]
    fn test_entries(#[case] input: &str, #[case] expected: Entry<'_>) {
        assert_eq!(single_entry(input), expected);
    }

    #[test]
    fn test_parse_ledger_tracks_lines() {
        let input = "\
members := alice bob

// dinner
alice paid 40 for alice bob
bob settled 20 to alice
";
        let ledger = parse_ledger(input).expect("ledger should parse");

        assert_eq!(ledger.members, vec!["alice", "bob"]);
        let lines: Vec<usize> = ledger.entries.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![4, 5]);
    }

    #[rstest]
    #[case::inline_comment("alice paid 40 /* taxi */ for alice bob")]
    #[case::trailing_comment("alice paid 40 for alice bob // taxi")]
    #[case::leading_spaces("   alice paid 40 for alice bob")]
    fn test_accepts_comments_and_spacing(#[case] line: &str) {
        let input = format!("members := alice bob\n{line}");
        let ledger = parse_ledger(&input).expect("ledger should parse");
        assert_eq!(ledger.entries.len(), 1);
    }

    #[rstest]
    #[case::missing_members("alice paid 40 for alice", ParseError::MissingMembersDeclaration)]
    #[case::duplicate_members(
        "members := alice\nmembers := bob",
        ParseError::DuplicateMembersDeclaration { line: 2 }
    )]
    fn test_declaration_errors(#[case] input: &str, #[case] expected: ParseError) {
        assert_eq!(parse_ledger(input), Err(expected));
    }

    #[rstest]
    #[case::unknown_verb("members := a b\na borrowed 10 from b", 2)]
    #[case::negative_amount("members := a b\na paid -10 for a b", 2)]
    #[case::trailing_garbage("members := a b\na settled 10 to b !!", 2)]
    #[case::unterminated_comment("members := a b /* note", 1)]
    fn test_syntax_errors_report_line(#[case] input: &str, #[case] expected_line: usize) {
        match parse_ledger(input) {
            Err(ParseError::SyntaxError { line, .. }) => assert_eq!(line, expected_line),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
