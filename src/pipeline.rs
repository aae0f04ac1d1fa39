use crate::*;
use sqlx::SqlitePool;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one question.
///
/// `statement` is set as soon as the completion has been normalized, so it is
/// available even when execution fails.
#[derive(Debug)]
pub struct Answer {
    pub question: String,
    pub statement: Option<GeneratedStatement>,
    pub result: Result<ResultSet>,
}

impl Answer {
    pub fn rows(&self) -> &[Row] {
        self.result.as_ref().map(|r| r.rows.as_slice()).unwrap_or(&[])
    }

    pub fn into_parts(self) -> (Vec<Row>, Option<Error>) {
        match self.result {
            Ok(result) => (result.rows, None),
            Err(error) => (Vec::new(), Some(error)),
        }
    }
}

/// Text-to-SQL over a caller-owned pool.
///
/// Each question acquires its own pooled connection for the whole run and
/// gives it back on every exit path.
pub struct Pipeline<C> {
    pool: SqlitePool,
    client: C,
    executor: Executor,
    timeout: Duration,
}

impl<C: Completion> Pipeline<C> {
    pub fn new(pool: SqlitePool, client: C) -> Self {
        Self {
            pool,
            client,
            executor: Executor::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: StatementPolicy) -> Self {
        self.executor = Executor::new(policy);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub async fn ask(&self, question: &str) -> Answer {
        self.ask_with_cancel(question, &CancellationToken::new())
            .await
    }

    #[tracing::instrument(skip(self, cancel))]
    pub async fn ask_with_cancel(&self, question: &str, cancel: &CancellationToken) -> Answer {
        let mut statement = None;
        let result = self.run(question, cancel, &mut statement).await;
        match &result {
            Ok(rows) => info!("Answered with {} rows", rows.len()),
            Err(e) => warn!("Question failed: {e}"),
        }
        Answer {
            question: question.to_string(),
            statement,
            result,
        }
    }

    async fn run(
        &self,
        question: &str,
        cancel: &CancellationToken,
        statement: &mut Option<GeneratedStatement>,
    ) -> Result<ResultSet> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(Error::SchemaUnavailable)?;

        let schema = describe_schema(&mut *conn).await?;
        let prompt = build_prompt(&schema, question);
        let raw = self.complete(&prompt, cancel).await?;

        let stmt = normalize(&raw);
        debug!("Generated SQL: {stmt}");
        let stmt = statement.insert(stmt);

        self.executor.execute(&mut conn, stmt).await
    }

    async fn complete(&self, prompt: &Prompt, cancel: &CancellationToken) -> Result<String> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            completed = tokio::time::timeout(self.timeout, self.client.complete(prompt)) => {
                completed.map_err(|_| Error::CompletionTimeout(self.timeout))?
            }
        }
    }
}

impl Pipeline<CompletionClient> {
    /// Pipeline wired the way the configuration describes.
    pub fn from_config(pool: SqlitePool, config: &Config) -> Result<Self> {
        let policy = if config.read_only {
            StatementPolicy::ReadOnly
        } else {
            StatementPolicy::Unrestricted
        };
        Ok(Self::new(pool, CompletionClient::from_config(&config.completion)?)
            .with_policy(policy)
            .with_timeout(config.completion.timeout()))
    }
}
