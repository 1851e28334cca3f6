//! Fallbacks invoked when a client call fails.

use std::sync::Arc;

use crate::ClientError;

/// Creates a fallback implementation of `T` for each failure.
pub trait FallbackFactory<T: ?Sized>: Send + Sync {
    /// Create the fallback for the given failure.
    fn create(&self, cause: &ClientError) -> Arc<T>;
}

impl<T: ?Sized, F> FallbackFactory<T> for F
where
    F: Fn(&ClientError) -> Arc<T> + Send + Sync,
{
    fn create(&self, cause: &ClientError) -> Arc<T> {
        self(cause)
    }
}

/// Per-failure constructor stored by the builder.
pub type FallbackFn<T> = Arc<dyn Fn(&ClientError) -> Arc<T> + Send + Sync>;

/// Wrap a factory so its output satisfies the client's interface type.
pub fn from_factory<T: ?Sized + 'static>(factory: Arc<dyn FallbackFactory<T>>) -> FallbackFn<T> {
    Arc::new(move |cause: &ClientError| factory.create(cause))
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Greeter: Send + Sync {
        fn greet(&self) -> String;
    }

    struct Static(String);

    impl Greeter for Static {
        fn greet(&self) -> String {
            self.0.clone()
        }
    }

    #[test]
    fn test_closure_is_a_factory() {
        let factory: Arc<dyn FallbackFactory<dyn Greeter>> =
            Arc::new(|cause: &ClientError| -> Arc<dyn Greeter> {
                Arc::new(Static(format!("fallback: {cause}")))
            });
        let fallback = from_factory(factory);

        let greeter = fallback(&ClientError::Connection("refused".into()));
        assert_eq!(greeter.greet(), "fallback: Connection error: refused");
    }
}
