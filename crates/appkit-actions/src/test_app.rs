//! Smoke-test app exercising the runner and the datastore.

use anyhow::Result;
use appkit_core::{ActionParams, ActionResult, Payload};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::action::{payload, Action, ActionContext, AppInfo};
use crate::registry::ActionRegistry;

pub const APP_NAME: &str = "test-app";
pub const APP_VERSION: &str = "1.0.0";

/// Registry for the test app: built-ins plus its own actions.
pub fn registry() -> Result<ActionRegistry> {
    let mut registry = ActionRegistry::with_builtins(AppInfo::new(
        APP_NAME,
        APP_VERSION,
        "Test app exercising dispatch and the datastore",
    ))?;
    register(&mut registry)?;
    Ok(registry)
}

pub fn register(registry: &mut ActionRegistry) -> Result<()> {
    registry.register(Arc::new(HelloWorld))?;
    registry.register(Arc::new(TestExecutionIsolation))?;
    Ok(())
}

/// Seconds since the epoch, with millisecond precision.
fn unix_timestamp() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HelloWorldParams {
    #[serde(default = "default_name")]
    name: String,
}

fn default_name() -> String {
    "World".to_string()
}

#[derive(Debug)]
pub struct HelloWorld;

#[async_trait]
impl Action for HelloWorld {
    fn name(&self) -> &str {
        "hello_world"
    }

    fn description(&self) -> &str {
        "Greet someone and round-trip a value through the datastore"
    }

    async fn execute(

        &self,

        context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: HelloWorldParams = params.parse()?;
        let message = format!(
            "Hello {}! Using {} {}",
            params.name, context.app.name, context.app.version
        );

        let test_key = format!("test_execution_{}", Utc::now().timestamp());
        context
            .datastore
            .set(
                test_key.clone(),
                json!({ "message": message, "timestamp": unix_timestamp() }),
            )
            .await;
        let stored_data = context.datastore.get(&test_key).await;

        Ok(payload(json!({
            "message": message,
            "stored_data": stored_data,
            "app_version": context.app.version,
            "sdk_features": "set_datastore_key working",
        })))
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct IsolationParams {
    #[serde(default = "default_execution_id")]
    execution_id: String,
    /// Simulated work between the two datastore writes.
    #[serde(default = "default_delay_ms")]
    delay_ms: u64,
}

fn default_execution_id() -> String {
    "default".to_string()
}

fn default_delay_ms() -> u64 {
    2000
}

#[derive(Debug)]
pub struct TestExecutionIsolation;

#[async_trait]
impl Action for TestExecutionIsolation {
    fn name(&self) -> &str {
        "test_execution_isolation"
    }

    fn description(&self) -> &str {
        "Record execution state before and after simulated work"
    }

    async fn execute(

        &self,

        context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: IsolationParams = params.parse()?;
        let execution_key = format!(
            "execution_{}_{}",
            params.execution_id,
            Utc::now().timestamp()
        );

        let mut execution_data = json!({
            "execution_id": params.execution_id,
            "started_at": unix_timestamp(),
            "status": "running",
            "test_data": format!("Test data for execution {}", params.execution_id),
        });
        context
            .datastore
            .set(execution_key.clone(), execution_data.clone())
            .await;

        tokio::time::sleep(Duration::from_millis(params.delay_ms)).await;

        execution_data["status"] = json!("completed");
        execution_data["completed_at"] = json!(unix_timestamp());
        context
            .datastore
            .set(execution_key.clone(), execution_data.clone())
            .await;

        tracing::debug!(
            execution_key = %execution_key,
            runner_execution_id = %context.execution_id,
            "Execution isolation test completed"
        );

        Ok(payload(json!({
            "execution_id": params.execution_id,
            "execution_key": execution_key,
            "execution_data": execution_data,
            "datastore_used": true,
            "message": "Execution isolation test completed successfully",
        })))
    }
}
