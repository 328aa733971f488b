//! Parser for GDQL.
//!
//! Recursive descent over the token stream with a single token of
//! lookahead. Dispatches on the leading keyword (SHOWS, SONGS,
//! PERFORMANCES, SETLIST) and produces an AST or a positioned
//! [`ParseError`].

use crate::error::ParseError;

use super::ast::*;
use super::lexer::Lexer;
use super::token::{Token, TokenKind};

pub struct Parser {
    lex: Lexer,
    cur: Token,
    peek: Token,
    query: String,
}

/// Modifier tail shared by shows/songs/performances queries.
#[derive(Default)]
struct Modifiers {
    order_by: Option<OrderClause>,
    limit: Option<u32>,
    output: OutputFormat,
}

impl Parser {
    pub fn new(input: &str) -> Self {
        let mut lex = Lexer::new(input);
        let cur = lex.next_token();
        let peek = lex.next_token();
        Self {
            lex,
            cur,
            peek,
            query: input.to_string(),
        }
    }

    /// Parse the input into a query AST.
    pub fn parse(&mut self) -> Result<Query, ParseError> {
        match self.cur.kind {
            TokenKind::Eof => Err(self.err("empty query")),
            TokenKind::Shows => self.parse_show_query().map(Query::Shows),
            TokenKind::Songs => self.parse_song_query().map(Query::Songs),
            TokenKind::Performances => self.parse_performance_query().map(Query::Performances),
            TokenKind::Setlist => self.parse_setlist_query().map(Query::Setlist),
            _ => Err(self.err(format!(
                "unexpected {}, expected SHOWS, SONGS, PERFORMANCES, or SETLIST",
                self.cur.kind
            ))),
        }
    }

    fn parse_show_query(&mut self) -> Result<ShowQuery, ParseError> {
        let mut q = ShowQuery::default();
        self.advance(); // SHOWS

        if self.cur_is(TokenKind::From) {
            self.advance();
            q.from = Some(self.parse_date_range()?);
        }
        if self.cur_is(TokenKind::Where) {
            self.advance();
            q.r#where = Some(self.parse_where_clause()?);
        }

        let m = self.parse_modifiers()?;
        q.order_by = m.order_by;
        q.limit = m.limit;
        q.output = m.output;

        self.optional_semicolon()?;
        Ok(q)
    }

    fn parse_song_query(&mut self) -> Result<SongQuery, ParseError> {
        let mut q = SongQuery::default();
        self.advance(); // SONGS

        if self.cur_is(TokenKind::With) {
            self.advance();
            q.with = Some(self.parse_with_clause()?);
        }
        if self.cur_is(TokenKind::Written) {
            self.advance();
            q.written = Some(self.parse_date_range()?);
        }

        let m = self.parse_modifiers()?;
        q.order_by = m.order_by;
        q.limit = m.limit;
        q.output = m.output;

        self.optional_semicolon()?;
        Ok(q)
    }

    fn parse_performance_query(&mut self) -> Result<PerformanceQuery, ParseError> {
        self.advance(); // PERFORMANCES
        if !self.cur_is(TokenKind::Of) {
            return Err(self.err("expected OF after PERFORMANCES"));
        }
        self.advance();
        let song = self.parse_song_ref()?;

        let mut q = PerformanceQuery {
            song,
            from: None,
            with: None,
            order_by: None,
            limit: None,
            output: OutputFormat::Default,
        };

        if self.cur_is(TokenKind::From) {
            self.advance();
            q.from = Some(self.parse_date_range()?);
        }
        if self.cur_is(TokenKind::With) {
            self.advance();
            q.with = Some(self.parse_with_clause()?);
        }

        let m = self.parse_modifiers()?;
        q.order_by = m.order_by;
        q.limit = m.limit;
        q.output = m.output;

        self.optional_semicolon()?;
        Ok(q)
    }

    fn parse_setlist_query(&mut self) -> Result<SetlistQuery, ParseError> {
        self.advance(); // SETLIST
        if !self.cur_is(TokenKind::For) {
            return Err(self.err("expected FOR after SETLIST"));
        }
        self.advance();
        let date = self.parse_setlist_date()?;
        self.optional_semicolon()?;
        Ok(SetlistQuery { date })
    }

    // --- dates ---

    fn parse_date_range(&mut self) -> Result<DateRange, ParseError> {
        let mut dr = DateRange::default();
        if let Some(era) = self.parse_era_alias() {
            self.advance();
            dr.era = Some(era);
        } else if self.cur_is(TokenKind::Number) {
            let year = self.parse_number()? as i32;
            self.advance();
            dr.start = Some(Date {
                year,
                ..Date::default()
            });
        } else {
            return Err(self.err("expected date (year or era alias)"));
        }

        if self.cur_is(TokenKind::Minus) && self.peek_is(TokenKind::Number) {
            self.advance(); // -
            let year = self.parse_number()? as i32;
            self.advance();
            dr.end = Some(Date {
                year,
                ..Date::default()
            });
        }

        Ok(dr)
    }

    fn parse_era_alias(&self) -> Option<EraAlias> {
        match self.cur.literal.to_uppercase().as_str() {
            "PRIMAL" => Some(EraAlias::Primal),
            "EUROPE72" | "EUROPE" => Some(EraAlias::Europe72),
            "WALLOFSOUND" | "WALLOFOUND" => Some(EraAlias::WallOfSound),
            "HIATUS" => Some(EraAlias::Hiatus),
            "BRENT" | "BRENT_ERA" => Some(EraAlias::Brent),
            "VINCE" | "VINCE_ERA" => Some(EraAlias::Vince),
            _ => None,
        }
    }

    /// Date for `SETLIST FOR`: M/D/YY, M/D/YYYY, a bare year, or a quoted
    /// pseudo-date kept verbatim in `season`.
    fn parse_setlist_date(&mut self) -> Result<Date, ParseError> {
        if self.cur_is(TokenKind::Str) {
            let season = self.cur.literal.clone();
            self.advance();
            return Ok(Date {
                season,
                ..Date::default()
            });
        }
        if !self.cur_is(TokenKind::Number) {
            return Err(self.err("expected date or string for SETLIST FOR"));
        }

        let first = self.parse_number()?;
        self.advance();

        if self.cur_is(TokenKind::Slash) {
            self.advance();
            if !self.cur_is(TokenKind::Number) {
                return Err(self.err("expected day in M/D/YY"));
            }
            let day = self.parse_number()?;
            self.advance();
            if !self.cur_is(TokenKind::Slash) {
                return Err(self.err("expected / and year in M/D/YY"));
            }
            self.advance();
            if !self.cur_is(TokenKind::Number) {
                return Err(self.err("expected year"));
            }
            let year = pivot_year(self.parse_number()? as i32);
            self.advance();
            return Ok(Date {
                year,
                month: first,
                day,
                season: String::new(),
            });
        }

        Ok(Date {
            year: pivot_year(first as i32),
            ..Date::default()
        })
    }

    // --- WHERE ---

    fn parse_where_clause(&mut self) -> Result<WhereClause, ParseError> {
        let mut wc = WhereClause::default();
        wc.conditions.push(self.parse_condition()?);

        while self.cur_is(TokenKind::And) || self.cur_is(TokenKind::Or) {
            wc.operators.push(if self.cur_is(TokenKind::And) {
                LogicOp::And
            } else {
                LogicOp::Or
            });
            self.advance();
            wc.conditions.push(self.parse_condition()?);
        }

        Ok(wc)
    }

    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        // NOT "Song"
        if self.cur_is(TokenKind::Not) {
            self.advance();
            let mut song = self.parse_song_ref()?;
            song.negated = true;
            return Ok(Condition::Played { song });
        }

        // SET1 OPENED "Song" / ENCORE = "Song"
        if let Some(set) = self.cur_set_position() {
            self.advance();
            let op = if self.cur_is(TokenKind::Opened) {
                PositionOp::Opened
            } else if self.cur_is(TokenKind::Closed) {
                PositionOp::Closed
            } else if self.cur_is(TokenKind::Eq) {
                PositionOp::Equals
            } else {
                return Err(self.err("expected OPENED, CLOSED, or ="));
            };
            self.advance();
            let song = self.parse_song_ref()?;
            return Ok(Condition::Position { set, op, song });
        }

        // PLAYED "Song"
        if self.cur_is(TokenKind::Played) {
            self.advance();
            let song = self.parse_song_ref()?;
            return Ok(Condition::Played { song });
        }

        // GUEST "Name"
        if self.cur_is(TokenKind::Guest) {
            self.advance();
            if !self.cur_is(TokenKind::Str) {
                return Err(self.err("expected string after GUEST"));
            }
            let name = self.cur.literal.clone();
            self.advance();
            return Ok(Condition::Guest { name });
        }

        // LENGTH ("Song") > 20min  or  LENGTH > 20min
        if self.cur_is(TokenKind::Length) {
            self.advance();
            let song = if self.cur_is(TokenKind::LParen) {
                self.advance();
                let s = self.parse_song_ref()?;
                if !self.cur_is(TokenKind::RParen) {
                    return Err(self.err("expected )"));
                }
                self.advance();
                Some(s)
            } else {
                None
            };
            let Some(op) = self.cur_comp_op() else {
                return Err(self.err("expected comparison operator"));
            };
            self.advance();
            if !self.cur_is(TokenKind::Duration) && !self.cur_is(TokenKind::Number) {
                return Err(self.err("expected duration (e.g. 20min)"));
            }
            let duration = self.cur.literal.clone();
            self.advance();
            return Ok(Condition::Length { song, op, duration });
        }

        // "Song A" > "Song B" ...
        if self.cur_is(TokenKind::Str) {
            return self.parse_segue_condition();
        }

        let mut hint =
            "use quoted song names, e.g. WHERE \"Scarlet Begonias\" > \"Fire on the Mountain\""
                .to_string();
        if self.cur_is(TokenKind::Illegal) || self.cur.literal.contains("unterminated") {
            hint.push_str(
                "; in PowerShell use single quotes around the whole query: \
                 gdql 'SHOWS WHERE \"Scarlet Begonias\" > \"Fire on the Mountain\"', \
                 or use -f query.gdql",
            );
        }
        Err(self
            .err(format!(
                "expected condition (got {} {:?})",
                self.cur.kind, self.cur.literal
            ))
            .with_hint(hint))
    }

    fn parse_segue_condition(&mut self) -> Result<Condition, ParseError> {
        let mut songs = vec![self.parse_song_ref()?];
        let mut operators = Vec::new();

        while let Some(op) = self.cur_segue_op() {
            self.advance();
            if !self.cur_is(TokenKind::Str) {
                return Err(self.err("expected song name after segue operator"));
            }
            songs.push(self.parse_song_ref()?);
            operators.push(op);
        }

        if songs.len() < 2 {
            return Err(self.err("segue requires at least two songs"));
        }
        Ok(Condition::Segue { songs, operators })
    }

    fn parse_song_ref(&mut self) -> Result<SongRef, ParseError> {
        if !self.cur_is(TokenKind::Str) {
            return Err(self.err("expected quoted song name"));
        }
        let r = SongRef::new(self.cur.literal.clone());
        self.advance();
        Ok(r)
    }

    // --- WITH ---

    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        let mut wc = WithClause::default();
        loop {
            if self.cur_is(TokenKind::Lyrics) {
                self.advance();
                if !self.cur_is(TokenKind::LParen) {
                    return Err(self.err("expected ( after LYRICS"));
                }
                self.advance();
                let mut words = Vec::new();
                while self.cur_is(TokenKind::Str) {
                    words.push(self.cur.literal.clone());
                    self.advance();
                    if self.cur_is(TokenKind::Comma) {
                        self.advance();
                    }
                }
                if !self.cur_is(TokenKind::RParen) {
                    return Err(self.err("expected )"));
                }
                self.advance();
                wc.conditions.push(WithCondition::Lyrics {
                    words,
                    logic: LogicOp::And,
                });
            } else if self.cur_is(TokenKind::Length) {
                self.advance();
                let Some(op) = self.cur_comp_op() else {
                    return Err(self.err("expected comparison after LENGTH"));
                };
                self.advance();
                if !self.cur_is(TokenKind::Duration) && !self.cur_is(TokenKind::Number) {
                    return Err(self.err("expected duration"));
                }
                let duration = self.cur.literal.clone();
                self.advance();
                wc.conditions.push(WithCondition::Length { op, duration });
            } else if self.cur_is(TokenKind::Guest) {
                self.advance();
                if !self.cur_is(TokenKind::Str) {
                    return Err(self.err("expected string after GUEST"));
                }
                wc.conditions.push(WithCondition::Guest {
                    name: self.cur.literal.clone(),
                });
                self.advance();
            } else {
                break;
            }

            if self.cur_is(TokenKind::Comma) {
                self.advance();
            } else {
                break;
            }
        }
        Ok(wc)
    }

    // --- modifiers ---

    fn parse_modifiers(&mut self) -> Result<Modifiers, ParseError> {
        let mut m = Modifiers::default();
        loop {
            if self.cur_is(TokenKind::Order) {
                self.advance();
                if !self.cur_is(TokenKind::By) {
                    return Err(self.err("expected BY after ORDER"));
                }
                self.advance();
                if !self.is_order_field() {
                    return Err(self.err("expected field name (DATE, LENGTH, RATING, etc.)"));
                }
                let field = self.cur.literal.clone();
                self.advance();
                let mut desc = false;
                if self.cur_is(TokenKind::Desc) {
                    desc = true;
                    self.advance();
                } else if self.cur_is(TokenKind::Asc) {
                    self.advance();
                }
                m.order_by = Some(OrderClause { field, desc });
            } else if self.cur_is(TokenKind::Limit) {
                self.advance();
                if !self.cur_is(TokenKind::Number) {
                    return Err(self.err("expected number after LIMIT"));
                }
                m.limit = Some(self.parse_number()?);
                self.advance();
            } else if self.cur_is(TokenKind::As) {
                self.advance();
                m.output = self.parse_output_format();
                self.advance();
            } else {
                return Ok(m);
            }
        }
    }

    fn is_order_field(&self) -> bool {
        if self.cur_is(TokenKind::Str) {
            return true;
        }
        matches!(
            self.cur.literal.to_uppercase().as_str(),
            "DATE" | "LENGTH" | "RATING" | "NAME" | "TIMES_PLAYED"
        )
    }

    fn parse_output_format(&self) -> OutputFormat {
        match self.cur.literal.to_uppercase().as_str() {
            "JSON" => OutputFormat::Json,
            "CSV" => OutputFormat::Csv,
            "SETLIST" => OutputFormat::Setlist,
            "CALENDAR" => OutputFormat::Calendar,
            "TABLE" => OutputFormat::Table,
            _ => OutputFormat::Default,
        }
    }

    fn optional_semicolon(&mut self) -> Result<(), ParseError> {
        if self.cur_is(TokenKind::Semicolon) {
            self.advance();
        }
        if !self.cur_is(TokenKind::Eof) {
            return Err(self.err("unexpected token after query"));
        }
        Ok(())
    }

    // --- token helpers ---

    fn advance(&mut self) {
        self.cur = std::mem::replace(&mut self.peek, self.lex.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn cur_set_position(&self) -> Option<SetPosition> {
        match self.cur.kind {
            TokenKind::Set1 => Some(SetPosition::Set1),
            TokenKind::Set2 => Some(SetPosition::Set2),
            TokenKind::Set3 => Some(SetPosition::Set3),
            TokenKind::Encore => Some(SetPosition::Encore),
            _ => None,
        }
    }

    fn cur_segue_op(&self) -> Option<SegueOp> {
        match self.cur.kind {
            TokenKind::Gt | TokenKind::Into => Some(SegueOp::Segue),
            TokenKind::GtGt | TokenKind::Then => Some(SegueOp::Break),
            TokenKind::TildeGt | TokenKind::Tease => Some(SegueOp::Tease),
            _ => None,
        }
    }

    fn cur_comp_op(&self) -> Option<CompOp> {
        match self.cur.kind {
            TokenKind::Gt => Some(CompOp::Gt),
            TokenKind::Lt => Some(CompOp::Lt),
            TokenKind::GtEq => Some(CompOp::GtEq),
            TokenKind::LtEq => Some(CompOp::LtEq),
            TokenKind::Eq => Some(CompOp::Eq),
            TokenKind::NotEq => Some(CompOp::NotEq),
            _ => None,
        }
    }

    fn parse_number(&self) -> Result<u32, ParseError> {
        self.cur
            .literal
            .parse()
            .map_err(|_| self.err(format!("number out of range: {}", self.cur.literal)))
    }

    fn err(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.cur.pos, message, self.query.clone())
    }
}

/// Two-digit years pivot at 70: 70-99 land in the 1900s, 00-69 in the 2000s
/// (`5/8/77` is 1977-05-08).
fn pivot_year(y: i32) -> i32 {
    if y < 100 {
        let y = y + 1900;
        if y < 1970 {
            return y + 100;
        }
        return y;
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> Result<Query, ParseError> {
        Parser::new(src).parse()
    }

    fn parse_shows(src: &str) -> ShowQuery {
        match parse(src).expect("parse failed") {
            Query::Shows(q) => q,
            other => panic!("expected ShowQuery, got {other:?}"),
        }
    }

    #[test]
    fn parse_shows_bare() {
        let q = parse_shows("SHOWS");
        assert!(q.from.is_none());
        assert!(q.r#where.is_none());
    }

    #[test]
    fn parse_shows_from_year() {
        let q = parse_shows("SHOWS FROM 1977");
        let dr = q.from.expect("expected date range");
        assert_eq!(dr.start.expect("start").year, 1977);
        assert!(dr.end.is_none());
        assert!(dr.era.is_none());
    }

    #[test]
    fn parse_shows_from_range() {
        let q = parse_shows("SHOWS FROM 1977-1978");
        let dr = q.from.expect("range");
        assert_eq!(dr.start.expect("start").year, 1977);
        assert_eq!(dr.end.expect("end").year, 1978);
    }

    #[test]
    fn parse_shows_from_era() {
        for (src, era) in [
            ("SHOWS FROM EUROPE72", EraAlias::Europe72),
            ("SHOWS FROM europe", EraAlias::Europe72),
            ("SHOWS FROM PRIMAL", EraAlias::Primal),
            ("SHOWS FROM wallofsound", EraAlias::WallOfSound),
            ("SHOWS FROM HIATUS", EraAlias::Hiatus),
            ("SHOWS FROM BRENT", EraAlias::Brent),
            ("SHOWS FROM VINCE_ERA", EraAlias::Vince),
        ] {
            let q = parse_shows(src);
            assert_eq!(q.from.expect("range").era, Some(era), "failed for {src}");
        }
    }

    #[test]
    fn parse_segue_condition_two_songs() {
        let q = parse_shows(r#"SHOWS WHERE "Scarlet Begonias" > "Fire on the Mountain""#);
        let wc = q.r#where.expect("where");
        assert_eq!(wc.conditions.len(), 1);
        match &wc.conditions[0] {
            Condition::Segue { songs, operators } => {
                assert_eq!(songs.len(), 2);
                assert_eq!(songs[0].name, "Scarlet Begonias");
                assert_eq!(operators, &[SegueOp::Segue]);
            }
            other => panic!("expected segue, got {other:?}"),
        }
    }

    #[test]
    fn parse_segue_chain_mixed_operators() {
        let q = parse_shows(r#"SHOWS WHERE "Help on the Way" > "Slipknot!" >> "Franklin's Tower" ~> "Dark Star""#);
        match &q.r#where.expect("where").conditions[0] {
            Condition::Segue { songs, operators } => {
                assert_eq!(songs.len(), 4);
                assert_eq!(
                    operators,
                    &[SegueOp::Segue, SegueOp::Break, SegueOp::Tease]
                );
            }
            other => panic!("expected segue, got {other:?}"),
        }
    }

    #[test]
    fn parse_segue_word_operators() {
        let q = parse_shows(r#"SHOWS WHERE "Scarlet Begonias" INTO "Fire on the Mountain" THEN "Truckin'""#);
        match &q.r#where.expect("where").conditions[0] {
            Condition::Segue { operators, .. } => {
                assert_eq!(operators, &[SegueOp::Segue, SegueOp::Break]);
            }
            other => panic!("expected segue, got {other:?}"),
        }
    }

    #[test]
    fn parse_segue_single_song_is_error() {
        assert!(parse(r#"SHOWS WHERE "Dark Star""#).is_err());
    }

    #[test]
    fn parse_position_condition() {
        let q = parse_shows(r#"SHOWS WHERE SET1 OPENED "Bertha""#);
        match &q.r#where.expect("where").conditions[0] {
            Condition::Position { set, op, song } => {
                assert_eq!(*set, SetPosition::Set1);
                assert_eq!(*op, PositionOp::Opened);
                assert_eq!(song.name, "Bertha");
            }
            other => panic!("expected position, got {other:?}"),
        }
    }

    #[test]
    fn parse_encore_equals() {
        let q = parse_shows(r#"SHOWS WHERE ENCORE = "Brokedown Palace""#);
        match &q.r#where.expect("where").conditions[0] {
            Condition::Position { set, op, .. } => {
                assert_eq!(*set, SetPosition::Encore);
                assert_eq!(*op, PositionOp::Equals);
            }
            other => panic!("expected position, got {other:?}"),
        }
    }

    #[test]
    fn parse_played_and_guest() {
        let q = parse_shows(r#"SHOWS WHERE PLAYED "Dark Star" AND GUEST "Branford Marsalis""#);
        let wc = q.r#where.expect("where");
        assert_eq!(wc.conditions.len(), 2);
        assert_eq!(wc.operators, vec![LogicOp::And]);
        assert!(matches!(&wc.conditions[0], Condition::Played { song } if !song.negated));
        assert!(
            matches!(&wc.conditions[1], Condition::Guest { name } if name == "Branford Marsalis")
        );
    }

    #[test]
    fn parse_not_condition() {
        let q = parse_shows(r#"SHOWS WHERE NOT "Casey Jones""#);
        match &q.r#where.expect("where").conditions[0] {
            Condition::Played { song } => assert!(song.negated),
            other => panic!("expected played, got {other:?}"),
        }
    }

    #[test]
    fn parse_or_operator_recorded() {
        let q = parse_shows(r#"SHOWS WHERE PLAYED "Dark Star" OR PLAYED "St. Stephen""#);
        assert_eq!(q.r#where.expect("where").operators, vec![LogicOp::Or]);
    }

    #[test]
    fn parse_length_condition_with_song() {
        let q = parse_shows(r#"SHOWS WHERE LENGTH("Dark Star") > 20min"#);
        match &q.r#where.expect("where").conditions[0] {
            Condition::Length { song, op, duration } => {
                assert_eq!(song.as_ref().expect("song").name, "Dark Star");
                assert_eq!(*op, CompOp::Gt);
                assert_eq!(duration, "20min");
            }
            other => panic!("expected length, got {other:?}"),
        }
    }

    #[test]
    fn parse_modifiers_order_limit_format() {
        let q = parse_shows("SHOWS FROM 1977 ORDER BY DATE DESC LIMIT 10 AS json");
        let ob = q.order_by.expect("order");
        assert_eq!(ob.field, "DATE");
        assert!(ob.desc);
        assert_eq!(q.limit, Some(10));
        assert_eq!(q.output, OutputFormat::Json);
    }

    #[test]
    fn parse_order_by_rating_asc() {
        let q = parse_shows("SHOWS ORDER BY RATING ASC");
        let ob = q.order_by.expect("order");
        assert_eq!(ob.field, "RATING");
        assert!(!ob.desc);
    }

    #[test]
    fn parse_trailing_semicolon() {
        assert!(parse("SHOWS FROM 1977;").is_ok());
    }

    #[test]
    fn parse_trailing_garbage_is_error() {
        assert!(parse("SHOWS FROM 1977; SHOWS").is_err());
    }

    #[test]
    fn parse_songs_with_lyrics() {
        let q = match parse(r#"SONGS WITH LYRICS("walkin", "grosvenor")"#).expect("parse") {
            Query::Songs(q) => q,
            other => panic!("expected SongQuery, got {other:?}"),
        };
        match &q.with.expect("with").conditions[0] {
            WithCondition::Lyrics { words, logic } => {
                assert_eq!(words, &["walkin", "grosvenor"]);
                assert_eq!(*logic, LogicOp::And);
            }
            other => panic!("expected lyrics, got {other:?}"),
        }
    }

    #[test]
    fn parse_songs_written_range() {
        let q = match parse("SONGS WRITTEN 1968-1970 ORDER BY NAME").expect("parse") {
            Query::Songs(q) => q,
            other => panic!("expected SongQuery, got {other:?}"),
        };
        let dr = q.written.expect("written");
        assert_eq!(dr.start.expect("start").year, 1968);
        assert_eq!(dr.end.expect("end").year, 1970);
    }

    #[test]
    fn parse_performances_of() {
        let q = match parse(r#"PERFORMANCES OF "Dark Star" FROM 1977 WITH LENGTH > 20min LIMIT 5"#)
            .expect("parse")
        {
            Query::Performances(q) => q,
            other => panic!("expected PerformanceQuery, got {other:?}"),
        };
        assert_eq!(q.song.name, "Dark Star");
        assert_eq!(q.from.expect("from").start.expect("start").year, 1977);
        assert_eq!(q.limit, Some(5));
        match &q.with.expect("with").conditions[0] {
            WithCondition::Length { op, duration } => {
                assert_eq!(*op, CompOp::Gt);
                assert_eq!(duration, "20min");
            }
            other => panic!("expected length, got {other:?}"),
        }
    }

    #[test]
    fn parse_performances_without_of_is_error() {
        assert!(parse(r#"PERFORMANCES "Dark Star""#).is_err());
    }

    #[test]
    fn parse_setlist_slash_date() {
        let q = match parse("SETLIST FOR 5/8/77").expect("parse") {
            Query::Setlist(q) => q,
            other => panic!("expected SetlistQuery, got {other:?}"),
        };
        assert_eq!((q.date.year, q.date.month, q.date.day), (1977, 5, 8));
    }

    #[test]
    fn parse_setlist_four_digit_year() {
        let q = match parse("SETLIST FOR 5/8/1977").expect("parse") {
            Query::Setlist(q) => q,
            other => panic!("expected SetlistQuery, got {other:?}"),
        };
        assert_eq!(q.date.year, 1977);
    }

    #[test]
    fn parse_setlist_pivot_below_70() {
        let q = match parse("SETLIST FOR 3/1/65").expect("parse") {
            Query::Setlist(q) => q,
            other => panic!("expected SetlistQuery, got {other:?}"),
        };
        // 65 pivots into the 2000s; the pivot boundary is 70.
        assert_eq!(q.date.year, 2065);
    }

    #[test]
    fn parse_setlist_string_pseudo_date() {
        let q = match parse(r#"SETLIST FOR "Cornell 1977""#).expect("parse") {
            Query::Setlist(q) => q,
            other => panic!("expected SetlistQuery, got {other:?}"),
        };
        assert_eq!(q.date.season, "Cornell 1977");
        assert_eq!(q.date.year, 0);
    }

    #[test]
    fn parse_empty_query_is_error() {
        assert!(parse("").is_err());
        assert!(parse("   -- just a comment").is_err());
    }

    #[test]
    fn parse_unknown_leading_keyword_is_error() {
        let err = parse("VENUES FROM 1977").expect_err("should fail");
        assert!(err.message.contains("expected SHOWS"));
    }

    #[test]
    fn parse_error_carries_position_and_query() {
        let err = parse("SHOWS FROM banana").expect_err("should fail");
        assert_eq!(err.pos.line, 1);
        assert_eq!(err.query, "SHOWS FROM banana");
    }

    #[test]
    fn parse_condition_error_has_shell_hint() {
        let err = parse("SHOWS WHERE Scarlet").expect_err("should fail");
        let hint = err.hint.expect("hint");
        assert!(hint.contains("quoted song names"));
    }

    #[test]
    fn parse_unterminated_string_hint_mentions_file_input() {
        let err = parse("SHOWS WHERE \"Scarlet").expect_err("should fail");
        let hint = err.hint.expect("hint");
        assert!(hint.contains("-f"));
    }

    #[test]
    fn pivot_year_boundaries() {
        assert_eq!(pivot_year(77), 1977);
        assert_eq!(pivot_year(70), 1970);
        assert_eq!(pivot_year(69), 2069);
        assert_eq!(pivot_year(0), 2000);
        assert_eq!(pivot_year(1977), 1977);
    }
}
