//! Query compilation — source text → tokens → AST → IR → parameterized SQL.

pub mod ast;
pub mod expand;
pub mod ir;
pub mod lexer;
pub mod parser;
pub mod plan;
pub mod resolve;
mod segue;
pub mod sqlgen;
pub mod token;

use std::sync::Arc;

use crate::cancel::CancelToken;
use crate::error::{GdqlError, ParseError};

pub use ast::Query;
pub use ir::QueryIR;
pub use sqlgen::{SqlArg, SqlQuery};

use parser::Parser;
use plan::Planner;
use resolve::SongResolver;

/// A fully lowered query: the IR plus the SQL it generates.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub ir: QueryIR,
    pub sql: SqlQuery,
}

/// The GDQL compiler.
///
/// Chains lexer → parser → planner → SQL generator.
pub struct Compiler {
    planner: Planner,
}

impl Compiler {
    pub fn new(songs: Arc<dyn SongResolver>) -> Self {
        Self {
            planner: Planner::new(songs),
        }
    }

    /// Parse source text into a query AST.
    pub fn parse(source: &str) -> Result<Query, ParseError> {
        Parser::new(source).parse()
    }

    /// Parse, plan, and generate SQL for a query string.
    pub fn compile(&self, ctx: &CancelToken, source: &str) -> Result<CompiledQuery, GdqlError> {
        let query = Self::parse(source)?;
        self.compile_ast(ctx, &query)
    }

    /// Plan and generate SQL for an already-parsed query.
    pub fn compile_ast(
        &self,
        ctx: &CancelToken,
        query: &Query,
    ) -> Result<CompiledQuery, GdqlError> {
        let ir = self.planner.plan(ctx, query)?;
        let sql = sqlgen::generate(&ir)?;
        Ok(CompiledQuery { ir, sql })
    }
}
