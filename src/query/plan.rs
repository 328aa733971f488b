//! Planner: lowers the AST into IR.
//!
//! Every song reference is resolved to an id and every temporal construct
//! expanded to absolute bounds before SQL generation. Resolution failures
//! come back as `SongNotFound` query errors decorated with suggestions.

use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::{GdqlError, QueryError, QueryErrorKind};

use super::ast::{self, Condition, Query, SongRef, WithCondition};
use super::expand;
use super::ir::{ConditionIR, OrderByIR, QueryIR, QueryType, SegueChainIR};
use super::resolve::{ResolveError, SongResolver};

pub struct Planner {
    songs: Arc<dyn SongResolver>,
}

impl Planner {
    pub fn new(songs: Arc<dyn SongResolver>) -> Self {
        Self { songs }
    }

    pub fn plan(&self, ctx: &CancelToken, query: &Query) -> Result<QueryIR, GdqlError> {
        match query {
            Query::Shows(q) => self.plan_shows(ctx, q),
            Query::Songs(q) => self.plan_songs(ctx, q),
            Query::Performances(q) => self.plan_performances(ctx, q),
            Query::Setlist(q) => self.plan_setlist(q),
        }
    }

    fn plan_shows(&self, ctx: &CancelToken, q: &ast::ShowQuery) -> Result<QueryIR, GdqlError> {
        let mut out = QueryIR::new(QueryType::Shows);
        if let Some(from) = &q.from {
            out.date_range = expand::expand_range(from)?;
        }
        if let Some(wc) = &q.r#where {
            for (i, cond) in wc.conditions.iter().enumerate() {
                // The leading segue condition becomes the join chain; any
                // later segue would need a second chain and is dropped the
                // same way the generic lowering drops it.
                if let Condition::Segue { songs, operators } = cond {
                    if i == 0 && out.segue_chain.is_none() {
                        out.segue_chain = Some(self.segue_to_ir(ctx, songs, operators)?);
                        continue;
                    }
                }
                if let Some(ir) = self.condition_to_ir(ctx, cond)? {
                    out.conditions.push(ir);
                }
            }
        }
        out.order_by = order_by_ir(&q.order_by);
        out.limit = q.limit;
        out.output = q.output;
        Ok(out)
    }

    fn plan_songs(&self, _ctx: &CancelToken, q: &ast::SongQuery) -> Result<QueryIR, GdqlError> {
        let mut out = QueryIR::new(QueryType::Songs);
        if let Some(written) = &q.written {
            out.date_range = expand::expand_range(written)?;
        }
        if let Some(wc) = &q.with {
            for cond in &wc.conditions {
                out.conditions.push(self.with_condition_to_ir(cond));
            }
        }
        out.order_by = order_by_ir(&q.order_by);
        out.limit = q.limit;
        out.output = q.output;
        Ok(out)
    }

    fn plan_performances(
        &self,
        ctx: &CancelToken,
        q: &ast::PerformanceQuery,
    ) -> Result<QueryIR, GdqlError> {
        let mut out = QueryIR::new(QueryType::Performances);
        out.song_id = Some(self.resolve(ctx, &q.song)?);
        if let Some(from) = &q.from {
            out.date_range = expand::expand_range(from)?;
        }
        if let Some(wc) = &q.with {
            for cond in &wc.conditions {
                out.conditions.push(self.with_condition_to_ir(cond));
            }
        }
        out.order_by = order_by_ir(&q.order_by);
        out.limit = q.limit;
        out.output = q.output;
        Ok(out)
    }

    fn plan_setlist(&self, q: &ast::SetlistQuery) -> Result<QueryIR, GdqlError> {
        let mut out = QueryIR::new(QueryType::Setlist);
        if !q.date.season.is_empty() {
            // A quoted pseudo-date ("Cornell 1977") has no calendar meaning
            // yet; reject instead of generating a dateless setlist query.
            return Err(QueryError::date_invalid(q.date.season.clone())
                .with_hint("use M/D/YY, e.g. SETLIST FOR 5/8/77")
                .into());
        }
        out.single_date = Some(expand::expand_date(&q.date)?);
        Ok(out)
    }

    fn segue_to_ir(
        &self,
        ctx: &CancelToken,
        songs: &[SongRef],
        operators: &[ast::SegueOp],
    ) -> Result<SegueChainIR, GdqlError> {
        let mut ids = Vec::with_capacity(songs.len());
        for song in songs {
            ids.push(self.resolve(ctx, song)?);
        }
        Ok(SegueChainIR {
            song_ids: ids,
            operators: operators.to_vec(),
        })
    }

    fn condition_to_ir(
        &self,
        ctx: &CancelToken,
        cond: &Condition,
    ) -> Result<Option<ConditionIR>, GdqlError> {
        match cond {
            // A non-leading segue has no place in the generic condition
            // list; the chain join handles the leading one.
            Condition::Segue { .. } => Ok(None),
            Condition::Position { set, op, song } => Ok(Some(ConditionIR::Position {
                set: *set,
                op: *op,
                song_id: self.resolve(ctx, song)?,
            })),
            Condition::Played { song } => Ok(Some(ConditionIR::Played {
                song_id: self.resolve(ctx, song)?,
                negated: song.negated,
            })),
            Condition::Length { song, op, duration } => {
                let song_id = match song {
                    Some(s) => Some(self.resolve(ctx, s)?),
                    None => None,
                };
                Ok(Some(ConditionIR::Length {
                    song_id,
                    op: *op,
                    seconds: parse_duration(duration),
                }))
            }
            Condition::Guest { name } => Ok(Some(ConditionIR::Guest { name: name.clone() })),
        }
    }

    fn with_condition_to_ir(&self, cond: &WithCondition) -> ConditionIR {
        match cond {
            WithCondition::Lyrics { words, logic } => ConditionIR::Lyrics {
                words: words.clone(),
                logic: *logic,
            },
            WithCondition::Length { op, duration } => ConditionIR::Length {
                song_id: None,
                op: *op,
                seconds: parse_duration(duration),
            },
            WithCondition::Guest { name } => ConditionIR::Guest { name: name.clone() },
        }
    }

    fn resolve(&self, ctx: &CancelToken, song: &SongRef) -> Result<i64, GdqlError> {
        match self.songs.resolve(ctx, &song.name) {
            Ok(id) => Ok(id),
            Err(ResolveError::NotFound(name)) => {
                let suggestions = self.songs.suggest(ctx, &name);
                let mut err =
                    QueryError::new(QueryErrorKind::SongNotFound, name).with_suggestions(suggestions);
                if err.suggestions.is_empty() {
                    err = err.with_hint(
                        "The database may be empty or this song was never imported. \
                         Run `gdql init` to create a seeded catalog, or check the song name.",
                    );
                }
                Err(err.into())
            }
            Err(ResolveError::Data(e)) => Err(e.into()),
        }
    }
}

fn order_by_ir(order: &Option<ast::OrderClause>) -> Option<OrderByIR> {
    order.as_ref().map(|o| OrderByIR {
        field: o.field.clone(),
        desc: o.desc,
    })
}

/// Parse a duration literal ("20min", "15 minutes", "90sec") into seconds.
/// The unit set is closed; an empty or unrecognized unit yields zero.
pub fn parse_duration(s: &str) -> i64 {
    let s = s.trim().to_lowercase();
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    let unit = s[digits.len()..].trim();
    let mult = match unit {
        "min" | "mins" | "minute" | "minutes" => 60,
        "sec" | "secs" | "second" | "seconds" => 1,
        _ => return 0,
    };
    digits.parse::<i64>().map_or(0, |n| n * mult)
}
