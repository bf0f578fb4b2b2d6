//! Return-shape adapters around the execution engine.
//!
//! Generated method bodies bind a statement and then hand it to one of the
//! adapters here: blocking for unit-shaped methods, plain async for future
//! shapes, and [`ReactiveExecution`] for stream shapes.

use futures::future::{self, Either};
use futures::stream::{self, Stream, StreamExt};

use crate::binding::BoundStatement;
use crate::errors::ExecError;
use crate::executor::{Row, StatementExecutor};

/// Execute and block the calling thread until the engine completes.
/// Failure surfaces as a synchronous `Err`.
pub fn execute_blocking<X>(engine: &X, statement: BoundStatement) -> Result<(), ExecError>
where
    X: StatementExecutor + ?Sized,
{
    futures::executor::block_on(engine.execute(statement)).map(|_| ())
}

/// Execute without blocking; resolves once the engine completes.
pub async fn execute_async<X>(engine: &X, statement: BoundStatement) -> Result<(), ExecError>
where
    X: StatementExecutor + ?Sized,
{
    engine.execute(statement).await.map(|_| ())
}

/// A cold execution: constructing it performs no work, and every call to
/// [`subscribe`](Self::subscribe) re-runs the full bind-and-execute sequence.
///
/// For increment statements this means each subscription re-applies the
/// delta. That is intentional and matches the statement semantics; callers
/// that want exactly-one application must subscribe exactly once.
pub struct ReactiveExecution<'a, X>
where
    X: StatementExecutor,
{
    engine: &'a X,
    bind: Box<dyn Fn() -> Result<BoundStatement, ExecError> + 'a>,
}

impl<'a, X> ReactiveExecution<'a, X>
where
    X: StatementExecutor,
{
    /// Side-effect-free: `bind` is not invoked until a subscription is polled.
    pub fn new(
        engine: &'a X,
        bind: Box<dyn Fn() -> Result<BoundStatement, ExecError> + 'a>,
    ) -> Self {
        Self { engine, bind }
    }

    /// Start one independent execution. Failures, including bind failures,
    /// arrive as an `Err` item on the stream; this call itself cannot fail.
    pub fn subscribe(&self) -> impl Stream<Item = Result<Row, ExecError>> + '_ {
        stream::once(async move {
            let statement = (self.bind)()?;
            self.engine.execute(statement).await
        })
        .flat_map(|outcome| match outcome {
            Ok(outcome) => Either::Left(stream::iter(outcome.rows.into_iter().map(Ok))),
            Err(err) => Either::Right(stream::once(future::ready(Err(err)))),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::executor::ExecutionOutcome;
    use crate::statement::{StatementPlan, TableRef};

    struct CountingEngine {
        executions: Mutex<u32>,
        fail: bool,
    }

    impl CountingEngine {
        fn new(fail: bool) -> Self {
            Self {
                executions: Mutex::new(0),
                fail,
            }
        }

        fn executions(&self) -> u32 {
            *self.executions.lock().unwrap()
        }
    }

    impl StatementExecutor for CountingEngine {
        async fn execute(&self, _statement: BoundStatement) -> Result<ExecutionOutcome, ExecError> {
            *self.executions.lock().unwrap() += 1;
            if self.fail {
                return Err(ExecError::engine("engine unavailable"));
            }
            Ok(ExecutionOutcome::empty())
        }
    }

    fn statement() -> BoundStatement {
        let plan = StatementPlan::update("increment", "Votes", TableRef::new(None, "votes"))
            .set("up_votes")
            .where_eq("article_id");
        let text = plan.render();
        crate::binding::BoundStatementBuilder::new(plan, text).build()
    }

    #[test]
    fn blocking_adapter_surfaces_failures_synchronously() {
        let engine = CountingEngine::new(true);
        let err = execute_blocking(&engine, statement()).unwrap_err();
        assert!(matches!(err, ExecError::Engine { .. }));
    }

    #[test]
    fn construction_and_subscription_setup_run_nothing() {
        let engine = CountingEngine::new(false);
        let reactive = ReactiveExecution::new(&engine, Box::new(|| Ok(statement())));
        assert_eq!(engine.executions(), 0);
        let subscription = reactive.subscribe();
        assert_eq!(engine.executions(), 0);
        drop(subscription);
        assert_eq!(engine.executions(), 0);
    }

    #[test]
    fn each_subscription_is_an_independent_execution() {
        let engine = CountingEngine::new(false);
        let reactive = ReactiveExecution::new(&engine, Box::new(|| Ok(statement())));
        futures::executor::block_on(async {
            let _: Vec<_> = reactive.subscribe().collect().await;
            let _: Vec<_> = reactive.subscribe().collect().await;
        });
        assert_eq!(engine.executions(), 2);
    }

    #[test]
    fn failures_arrive_as_error_items() {
        let engine = CountingEngine::new(true);
        let reactive = ReactiveExecution::new(&engine, Box::new(|| Ok(statement())));
        let items: Vec<_> = futures::executor::block_on(reactive.subscribe().collect::<Vec<_>>());
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[test]
    fn bind_failures_arrive_as_error_items_too() {
        let engine = CountingEngine::new(false);
        let reactive: ReactiveExecution<'_, CountingEngine> = ReactiveExecution::new(
            &engine,
            Box::new(|| {
                Err(ExecError::Encode {
                    message: "bad entity".to_string(),
                })
            }),
        );
        let items: Vec<_> = futures::executor::block_on(reactive.subscribe().collect::<Vec<_>>());
        assert!(matches!(items[0], Err(ExecError::Encode { .. })));
        assert_eq!(engine.executions(), 0);
    }
}
