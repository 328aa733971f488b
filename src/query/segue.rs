//! Segue-chain join synthesizer.
//!
//! A chain of n songs becomes an n-way self-join over `performances` with a
//! monotone `position = position - 1` link between adjacent aliases: exactly
//! "adjacent in the same set", indexable by (show_id, set_number, position).
//! Aliases follow a stable schema (p1..pn, s1..sn) and arguments bind in a
//! fixed order: song ids, then segue symbols, then outer filters, then the
//! limit.

use std::fmt::Write as _;

use crate::error::GenerationError;

use super::ast::SegueOp;
use super::ir::{QueryIR, SegueChainIR};
use super::sqlgen::{format_date, push_show_condition, segue_symbol, SqlArg, SqlQuery, SHOW_COLUMNS};

pub(super) fn build_segue_shows_sql(
    q: &QueryIR,
    chain: &SegueChainIR,
) -> Result<SqlQuery, GenerationError> {
    let n = chain.song_ids.len();
    if n < 2 {
        return Err(GenerationError::SegueChainTooShort);
    }

    // Pad missing transitions with plain segues.
    let mut ops = chain.operators.clone();
    while ops.len() < n - 1 {
        ops.push(SegueOp::Segue);
    }

    let mut sql = format!("SELECT DISTINCT {SHOW_COLUMNS} FROM ");
    let mut args = Vec::new();

    for i in 1..=n {
        if i == 1 {
            let _ = write!(sql, "performances p{i}");
        } else {
            let prev = i - 1;
            let _ = write!(
                sql,
                " JOIN performances p{i} ON p{prev}.show_id = p{i}.show_id \
                 AND p{prev}.set_number = p{i}.set_number \
                 AND p{prev}.position = p{i}.position - 1"
            );
        }
    }
    for (i, song_id) in chain.song_ids.iter().enumerate() {
        let i = i + 1;
        let _ = write!(
            sql,
            " JOIN songs s{i} ON p{i}.song_id = s{i}.id AND s{i}.id = ?"
        );
        args.push(SqlArg::Int(*song_id));
    }
    for (i, op) in ops.iter().take(n - 1).enumerate() {
        let i = i + 1;
        let _ = write!(sql, " AND p{i}.segue_type = ?");
        args.push(SqlArg::Text(segue_symbol(*op).to_string()));
    }
    sql.push_str(" JOIN shows s ON p1.show_id = s.id LEFT JOIN venues v ON s.venue_id = v.id");

    let mut parts = Vec::new();
    if let Some(dr) = &q.date_range {
        parts.push("s.date >= ? AND s.date <= ?".to_string());
        args.push(SqlArg::Text(format_date(dr.start)));
        args.push(SqlArg::Text(format_date(dr.end)));
    }
    for cond in &q.conditions {
        // The chain occupies p1..pn; probing subqueries use px.
        push_show_condition(cond, "px", &mut parts, &mut args);
    }
    if !parts.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&parts.join(" AND "));
    }

    if let Some(order) = &q.order_by {
        let dir = if order.desc { "DESC" } else { "ASC" };
        let _ = write!(sql, " ORDER BY s.date {dir}");
    }
    if let Some(limit) = q.limit {
        sql.push_str(" LIMIT ?");
        args.push(SqlArg::Int(limit as i64));
    }

    Ok(SqlQuery { sql, args })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ir::{QueryType, ResolvedDateRange};
    use chrono::{TimeZone, Utc};

    fn chain_ir(ids: &[i64], ops: &[SegueOp]) -> (QueryIR, SegueChainIR) {
        let ir = QueryIR::new(QueryType::Shows);
        let chain = SegueChainIR {
            song_ids: ids.to_vec(),
            operators: ops.to_vec(),
        };
        (ir, chain)
    }

    #[test]
    fn two_song_chain_shape() {
        let (ir, chain) = chain_ir(&[1, 2], &[SegueOp::Segue]);
        let q = build_segue_shows_sql(&ir, &chain).expect("build");
        assert!(q.sql.starts_with("SELECT DISTINCT"));
        assert!(q.sql.contains("performances p1"));
        assert!(q.sql.contains(
            "JOIN performances p2 ON p1.show_id = p2.show_id AND p1.set_number = p2.set_number \
             AND p1.position = p2.position - 1"
        ));
        assert!(q.sql.contains("JOIN songs s1 ON p1.song_id = s1.id AND s1.id = ?"));
        assert!(q.sql.contains("JOIN songs s2 ON p2.song_id = s2.id AND s2.id = ?"));
        assert!(q.sql.contains("p1.segue_type = ?"));
        assert!(q.sql.contains("JOIN shows s ON p1.show_id = s.id"));
        assert_eq!(
            q.args,
            vec![SqlArg::Int(1), SqlArg::Int(2), SqlArg::Text(">".into())]
        );
    }

    #[test]
    fn chain_alias_and_join_counts() {
        for n in 2..=5 {
            let ids: Vec<i64> = (1..=n as i64).collect();
            let ops = vec![SegueOp::Segue; n - 1];
            let (ir, chain) = chain_ir(&ids, &ops);
            let q = build_segue_shows_sql(&ir, &chain).expect("build");

            for i in 1..=n {
                assert!(q.sql.contains(&format!("performances p{i}")), "p{i} for n={n}");
                assert!(q.sql.contains(&format!("songs s{i}")), "s{i} for n={n}");
            }
            assert_eq!(q.sql.matches(".position - 1").count(), n - 1, "adjacency joins");
            assert_eq!(q.sql.matches("segue_type = ?").count(), n - 1, "transitions");
            assert_eq!(q.sql.matches('?').count(), q.args.len(), "placeholders");
        }
    }

    #[test]
    fn argument_order_ids_then_symbols_then_filters_then_limit() {
        let (mut ir, chain) = chain_ir(&[1, 2, 10], &[SegueOp::Segue, SegueOp::Break]);
        ir.date_range = Some(ResolvedDateRange {
            start: Utc.with_ymd_and_hms(1977, 1, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(1978, 12, 31, 23, 59, 59).unwrap(),
        });
        ir.limit = Some(3);
        let q = build_segue_shows_sql(&ir, &chain).expect("build");
        assert_eq!(
            q.args,
            vec![
                SqlArg::Int(1),
                SqlArg::Int(2),
                SqlArg::Int(10),
                SqlArg::Text(">".into()),
                SqlArg::Text(">>".into()),
                SqlArg::Text("1977-01-01".into()),
                SqlArg::Text("1978-12-31".into()),
                SqlArg::Int(3),
            ]
        );
    }

    #[test]
    fn short_operator_list_padded_with_segue() {
        let (ir, chain) = chain_ir(&[1, 2, 10], &[]);
        let q = build_segue_shows_sql(&ir, &chain).expect("build");
        let symbols: Vec<_> = q
            .args
            .iter()
            .filter_map(|a| match a {
                SqlArg::Text(s) if s == ">" => Some(s.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn tease_symbol() {
        let (ir, chain) = chain_ir(&[1, 2], &[SegueOp::Tease]);
        let q = build_segue_shows_sql(&ir, &chain).expect("build");
        assert!(q.args.contains(&SqlArg::Text("~>".into())));
    }

    #[test]
    fn single_song_chain_is_error() {
        let (ir, chain) = chain_ir(&[1], &[]);
        assert_eq!(
            build_segue_shows_sql(&ir, &chain).expect_err("should fail"),
            GenerationError::SegueChainTooShort
        );
    }
}
