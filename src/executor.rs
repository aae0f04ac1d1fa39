//! Executor for generated statements.
use crate::*;
use sqlparser::{
    ast::Statement,
    dialect::SQLiteDialect,
    parser::Parser,
    tokenizer::{Token, Tokenizer},
};
use sqlx::{AssertSqlSafe, SqliteConnection};

static SQLITE: SQLiteDialect = SQLiteDialect {};

/// Which statement kinds the executor lets through to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatementPolicy {
    /// Whatever the connection's permissions allow.
    #[default]
    Unrestricted,
    /// Queries only; anything that cannot be shown to be a query is refused.
    ReadOnly,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Executor {
    policy: StatementPolicy,
}

impl Executor {
    pub fn new(policy: StatementPolicy) -> Self {
        Self { policy }
    }

    /// Run the statement and collect every row it yields.
    #[tracing::instrument(skip_all, fields(policy = ?self.policy))]
    pub async fn execute(
        &self,
        conn: &mut SqliteConnection,
        stmt: &GeneratedStatement,
    ) -> Result<ResultSet> {
        let sql = stmt.as_str();
        ensure_single_statement(sql)?;
        if self.policy == StatementPolicy::ReadOnly {
            ensure_read_only(sql)?;
        }

        // Never cached: the schema may change between questions on this connection.
        let rows = sqlx::query(AssertSqlSafe(sql.to_owned()))
            .persistent(false)
            .fetch_all(&mut *conn)
            .await
            .map_err(execution_error)?;
        let result = ResultSet::from_rows(&rows)?;
        debug!("Statement returned {} rows", result.len());
        Ok(result)
    }
}

/// The engine runs every statement in the text one after another and quietly
/// accepts text made only of terminators and comments. Exactly one statement
/// gets through.
fn ensure_single_statement(sql: &str) -> Result {
    let tokens = Tokenizer::new(&SQLITE, sql)
        .tokenize()
        .map_err(|e| Error::Execution(e.to_string()))?;
    let statements = tokens
        .split(|t| matches!(t, Token::SemiColon))
        .filter(|part| {
            part.iter()
                .any(|t| !matches!(t, Token::Whitespace(_) | Token::EOF))
        })
        .count();
    match statements {
        0 => Err(Error::Execution(
            "statement contains no SQL to execute".into(),
        )),
        1 => Ok(()),
        _ => Err(Error::Execution(
            "You can only execute one statement at a time.".into(),
        )),
    }
}

fn ensure_read_only(sql: &str) -> Result {
    let statements = Parser::parse_sql(&SQLITE, sql)?;
    match statements
        .iter()
        .find(|s| !matches!(s, Statement::Query(_)))
    {
        Some(statement) => Err(Error::StatementRejected(format!(
            "only queries are allowed, got: {statement}"
        ))),
        None => Ok(()),
    }
}

fn execution_error(error: sqlx::Error) -> Error {
    match error {
        sqlx::Error::Database(db_error) => Error::Execution(db_error.message().to_string()),
        error => Error::Database(error),
    }
}
