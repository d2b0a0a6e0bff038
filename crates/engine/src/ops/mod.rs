use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{Mailer, PriceQuotes};

mod access;
mod bank_accounts;
mod bills;
mod budgets;
mod investments;
mod transactions;

pub use transactions::TransactionListFilter;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

pub struct Engine {
    database: DatabaseConnection,
    quotes: Option<Arc<dyn PriceQuotes>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("quotes", &self.quotes.is_some())
            .field("mailer", &self.mailer.is_some())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    quotes: Option<Arc<dyn PriceQuotes>>,
    mailer: Option<Arc<dyn Mailer>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Optional price-quote collaborator for investment refreshes.
    pub fn quotes(mut self, quotes: Arc<dyn PriceQuotes>) -> EngineBuilder {
        self.quotes = Some(quotes);
        self
    }

    /// Optional mail collaborator for bill reminders.
    pub fn mailer(mut self, mailer: Arc<dyn Mailer>) -> EngineBuilder {
        self.mailer = Some(mailer);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            quotes: self.quotes,
            mailer: self.mailer,
        }
    }
}
