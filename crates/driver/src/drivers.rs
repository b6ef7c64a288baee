//! The `driver` module contains implementations of the [Driver] trait.

use crate::{arena::GameArena, Driver, DriverConfig, Request};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Defines a new [Driver] implementation.
#[macro_export]
macro_rules! define_driver {
    ($name:ident, $inner:expr) => {
        #[allow(dead_code)]
        #[doc = concat!("Variant of the [Driver] trait: [", stringify!($name), "]")]
        pub struct $name {
            /// The configuration for all of the drivers.
            pub config: Arc<DriverConfig>,
        }

        #[async_trait]
        impl Driver for $name {
            async fn start_loop(self) -> Result<()> {
                #[allow(clippy::redundant_closure_call)]
                $inner(self).await
            }
        }

        impl $name {
            #[doc = concat!("Creates a new instance of the [", stringify!($name), "] driver.")]
            pub fn new(config: Arc<DriverConfig>) -> Self {
                Self { config }
            }
        }
    };
}

define_driver!(
    GameDriver,
    (|driver: GameDriver| {
        async move {
            tracing::info!(target: "game-driver", "Starting game driver...");
            let mut arena = GameArena::new(&driver.config.world)?;
            let mut locked_receive_ch = driver.config.request_receiver.lock().await;
            tracing::info!(target: "game-driver", "Locked receive channel mutex successfully. Beginning request loop.");

            while let Some((request, reply)) = locked_receive_ch.recv().await {
                tracing::debug!(target: "game-driver", "Request received: {:?}", request);
                let shutdown = matches!(request, Request::Shutdown);

                let outcome = arena.handle(request).map_err(anyhow::Error::from);
                if let Err(e) = &outcome {
                    // Soft failure, the arena is untouched and the loop continues.
                    tracing::warn!(target: "game-driver", "Request failed: {}", e);
                }
                if reply.send(outcome).is_err() {
                    tracing::debug!(target: "game-driver", "Requester dropped before the reply was sent");
                }

                if shutdown {
                    tracing::info!(target: "game-driver", "Shutdown requested, exiting request loop.");
                    break;
                }
            }

            Ok(())
        }
    })
);
