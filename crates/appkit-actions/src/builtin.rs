//! Datastore actions available in every app.

use anyhow::Result;
use appkit_core::{ActionParams, ActionResult, Payload};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::action::{payload, Action, ActionContext};
use crate::registry::ActionRegistry;

pub(crate) fn register(registry: &mut ActionRegistry) -> Result<()> {
    registry.register(Arc::new(SetDatastoreKey))?;
    registry.register(Arc::new(GetDatastoreKey))?;
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SetParams {
    key: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GetParams {
    key: String,
}

#[derive(Debug)]
pub struct SetDatastoreKey;

#[async_trait]
impl Action for SetDatastoreKey {
    fn name(&self) -> &str {
        "set_datastore_key"
    }

    fn description(&self) -> &str {
        "Store a value in the datastore"
    }

    async fn execute(

        &self,

        context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: SetParams = params.parse()?;
        let status = context.datastore.set(params.key.clone(), params.value).await;
        Ok(payload(json!({
            "key": params.key,
            "mirror": status,
        })))
    }
}

#[derive(Debug)]
pub struct GetDatastoreKey;

#[async_trait]
impl Action for GetDatastoreKey {
    fn name(&self) -> &str {
        "get_datastore_key"
    }

    fn description(&self) -> &str {
        "Read a value from the datastore"
    }

    async fn execute(

        &self,

        context: &ActionContext,

        params: ActionParams,

    ) -> ActionResult<Payload> {
        let params: GetParams = params.parse()?;
        let value = context.datastore.get(&params.key).await;
        Ok(payload(json!({
            "key": params.key,
            "found": value.is_some(),
            "value": value,
        })))
    }
}
