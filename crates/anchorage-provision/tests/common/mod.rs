//! In-memory control plane for provisioning tests.
//!
//! Resources appear as soon as they are requested; the returned operation
//! stays pending for a configurable number of polls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;

use anchorage_core::model::{
    DeployIndexRequest, DeployedIndexRef, IndexEndpoint, IndexEndpointName, IndexMetadata,
    IndexName, NewIndex, NewIndexEndpoint, Operation, OperationName, Status, VectorIndex,
};
use anchorage_core::DisplayNameFilter;
use anchorage_provision::{
    ControlPlane, OperationWaiter, ProvisionError, ProvisionResult, ProvisionSettings,
};

pub const PROJECT: &str = "test-project";
pub const LOCATION: &str = "us-central1";

/// Settings with millisecond polling so tests stay fast.
pub fn fast_settings() -> ProvisionSettings {
    ProvisionSettings::default().with_waiter(OperationWaiter::new(
        Duration::from_millis(1),
        Duration::from_millis(50),
    ))
}

#[derive(Debug)]
struct PendingOperation {
    polls_left: usize,
    response: Option<serde_json::Value>,
    error: Option<Status>,
}

#[derive(Debug, Default)]
struct State {
    indexes: Vec<VectorIndex>,
    endpoints: Vec<IndexEndpoint>,
    operations: HashMap<String, PendingOperation>,
    next_id: u64,
    pending_polls: usize,
    operation_error: Option<Status>,
    deploy_error: Option<Status>,
    omit_response: bool,
    discard_created: bool,
    poll_latency: Duration,
    create_index_calls: Vec<NewIndex>,
    create_endpoint_calls: Vec<NewIndexEndpoint>,
    deploy_calls: Vec<(IndexEndpointName, DeployIndexRequest)>,
    operation_polls: usize,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn start_operation(
        &mut self,
        parent: &str,
        response: serde_json::Value,
        error: Option<Status>,
    ) -> Operation {
        let id = self.next_id();
        let name = format!("{parent}/operations/{id}");
        let operation_name = OperationName::parse(name.clone()).unwrap();
        let response = (!self.omit_response).then_some(response);

        if self.pending_polls == 0 {
            return finished(operation_name, response, error);
        }

        self.operations.insert(
            name,
            PendingOperation {
                polls_left: self.pending_polls,
                response,
                error,
            },
        );
        Operation {
            name: operation_name,
            done: false,
            error: None,
            response: None,
            metadata: None,
        }
    }
}

fn finished(
    name: OperationName,
    response: Option<serde_json::Value>,
    error: Option<Status>,
) -> Operation {
    Operation {
        name,
        done: true,
        response: if error.is_some() { None } else { response },
        error,
        metadata: None,
    }
}

#[derive(Debug, Default)]
pub struct FakeControlPlane {
    state: Mutex<State>,
}

impl FakeControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Keep every new operation pending for `polls` polls.
    pub fn with_pending_polls(self, polls: usize) -> Self {
        self.state().pending_polls = polls;
        self
    }

    /// Finish every operation with this error status.
    pub fn with_operation_error(self, code: i32, message: &str) -> Self {
        self.state().operation_error = Some(Status {
            code,
            message: message.to_string(),
        });
        self
    }

    /// Finish deploy operations with this error status; creates succeed.
    pub fn with_deploy_error(self, code: i32, message: &str) -> Self {
        self.state().deploy_error = Some(Status {
            code,
            message: message.to_string(),
        });
        self
    }

    /// Let later deploy operations succeed again.
    pub fn clear_deploy_error(&self) {
        self.state().deploy_error = None;
    }

    /// Finish operations without a response payload.
    pub fn without_operation_response(self) -> Self {
        self.state().omit_response = true;
        self
    }

    /// Report creations as successful but never store the resource.
    pub fn discarding_created(self) -> Self {
        self.state().discard_created = true;
        self
    }

    /// Delay every operation poll by `latency`.
    pub fn with_poll_latency(self, latency: Duration) -> Self {
        self.state().poll_latency = latency;
        self
    }

    pub fn seed_index(&self, display_name: &str, dimensions: u32) -> VectorIndex {
        let mut state = self.state();
        let id = state.next_id();
        let index = new_index(id, display_name, dimensions);
        state.indexes.push(index.clone());
        index
    }

    pub fn seed_endpoint(&self, display_name: &str, public: bool) -> IndexEndpoint {
        let mut state = self.state();
        let id = state.next_id();
        let endpoint = new_endpoint(id, display_name, public);
        state.endpoints.push(endpoint.clone());
        endpoint
    }

    /// Record `index` as deployed on `endpoint` under `deployed_index_id`.
    pub fn seed_deployment(&self, index: &IndexName, endpoint: &IndexEndpointName, deployed_index_id: &str) {
        let mut state = self.state();
        apply_deployment(&mut state, index, endpoint, deployed_index_id);
    }

    pub fn index_count(&self, display_name: &str) -> usize {
        self.state()
            .indexes
            .iter()
            .filter(|i| i.display_name == display_name)
            .count()
    }

    pub fn endpoint_count(&self, display_name: &str) -> usize {
        self.state()
            .endpoints
            .iter()
            .filter(|e| e.display_name == display_name)
            .count()
    }

    pub fn create_index_calls(&self) -> Vec<NewIndex> {
        self.state().create_index_calls.clone()
    }

    pub fn create_endpoint_calls(&self) -> Vec<NewIndexEndpoint> {
        self.state().create_endpoint_calls.clone()
    }

    pub fn deploy_calls(&self) -> Vec<(IndexEndpointName, DeployIndexRequest)> {
        self.state().deploy_calls.clone()
    }

    pub fn operation_polls(&self) -> usize {
        self.state().operation_polls
    }
}

fn new_index(id: u64, display_name: &str, dimensions: u32) -> VectorIndex {
    let index = serde_json::json!({
        "name": IndexName::from_parts(PROJECT, LOCATION, &id.to_string()).unwrap(),
        "displayName": display_name,
        "metadata": { "config": { "dimensions": dimensions } },
    });
    serde_json::from_value(index).unwrap()
}

fn new_endpoint(id: u64, display_name: &str, public: bool) -> IndexEndpoint {
    let endpoint = serde_json::json!({
        "name": IndexEndpointName::from_parts(PROJECT, LOCATION, &id.to_string()).unwrap(),
        "displayName": display_name,
        "publicEndpointEnabled": public,
    });
    serde_json::from_value(endpoint).unwrap()
}

fn apply_deployment(
    state: &mut State,
    index: &IndexName,
    endpoint: &IndexEndpointName,
    deployed_index_id: &str,
) {
    if let Some(i) = state.indexes.iter_mut().find(|i| &i.name == index) {
        i.deployed_indexes.push(DeployedIndexRef {
            index_endpoint: endpoint.clone(),
            deployed_index_id: deployed_index_id.to_string(),
        });
    }
    if let Some(e) = state.endpoints.iter_mut().find(|e| &e.name == endpoint) {
        e.deployed_indexes.push(anchorage_core::model::DeployedIndex {
            id: deployed_index_id.to_string(),
            index: index.clone(),
            display_name: Some(deployed_index_id.to_string()),
            dedicated_resources: None,
            create_time: None,
        });
    }
}

fn not_found(name: &str) -> ProvisionError {
    ProvisionError::Http {
        status: 404,
        message: format!("NOT_FOUND: {name}"),
    }
}

#[async_trait]
impl ControlPlane for FakeControlPlane {
    async fn list_indexes(&self, filter: &DisplayNameFilter) -> ProvisionResult<Vec<VectorIndex>> {
        Ok(self
            .state()
            .indexes
            .iter()
            .filter(|i| filter.matches(&i.display_name))
            .cloned()
            .collect())
    }

    async fn get_index(&self, name: &IndexName) -> ProvisionResult<VectorIndex> {
        self.state()
            .indexes
            .iter()
            .find(|i| &i.name == name)
            .cloned()
            .ok_or_else(|| not_found(name.as_str()))
    }

    async fn create_index(&self, index: &NewIndex) -> ProvisionResult<Operation> {
        let mut state = self.state();
        state.create_index_calls.push(index.clone());

        let id = state.next_id();
        let mut created = new_index(id, &index.display_name, index.metadata.config.dimensions);
        created.metadata = Some(IndexMetadata {
            config: index.metadata.config.clone(),
            contents_delta_uri: None,
        });
        created.index_update_method = Some(index.index_update_method);
        if state.operation_error.is_none() && !state.discard_created {
            state.indexes.push(created.clone());
        }

        let parent = created.name.to_string();
        let response = serde_json::to_value(&created).unwrap();
        let error = state.operation_error.clone();
        Ok(state.start_operation(&parent, response, error))
    }

    async fn list_index_endpoints(
        &self,
        filter: &DisplayNameFilter,
    ) -> ProvisionResult<Vec<IndexEndpoint>> {
        Ok(self
            .state()
            .endpoints
            .iter()
            .filter(|e| filter.matches(&e.display_name))
            .cloned()
            .collect())
    }

    async fn get_index_endpoint(&self, name: &IndexEndpointName) -> ProvisionResult<IndexEndpoint> {
        self.state()
            .endpoints
            .iter()
            .find(|e| &e.name == name)
            .cloned()
            .ok_or_else(|| not_found(name.as_str()))
    }

    async fn create_index_endpoint(
        &self,
        endpoint: &NewIndexEndpoint,
    ) -> ProvisionResult<Operation> {
        let mut state = self.state();
        state.create_endpoint_calls.push(endpoint.clone());

        let id = state.next_id();
        let created = new_endpoint(id, &endpoint.display_name, endpoint.public_endpoint_enabled);
        if state.operation_error.is_none() && !state.discard_created {
            state.endpoints.push(created.clone());
        }

        let parent = created.name.to_string();
        let response = serde_json::to_value(&created).unwrap();
        let error = state.operation_error.clone();
        Ok(state.start_operation(&parent, response, error))
    }

    async fn deploy_index(
        &self,
        endpoint: &IndexEndpointName,
        request: &DeployIndexRequest,
    ) -> ProvisionResult<Operation> {
        let mut state = self.state();
        state
            .deploy_calls
            .push((endpoint.clone(), request.clone()));

        if !state.endpoints.iter().any(|e| &e.name == endpoint) {
            return Err(not_found(endpoint.as_str()));
        }
        let error = state.operation_error.clone().or(state.deploy_error.clone());
        if error.is_none() {
            apply_deployment(
                &mut state,
                &request.deployed_index.index,
                endpoint,
                &request.deployed_index.id,
            );
        }

        let response = serde_json::json!({ "deployedIndex": request.deployed_index });
        Ok(state.start_operation(endpoint.as_str(), response, error))
    }

    async fn get_operation(&self, name: &OperationName) -> ProvisionResult<Operation> {
        let latency = self.state().poll_latency;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let mut state = self.state();
        state.operation_polls += 1;

        let Some(pending) = state.operations.get_mut(name.as_str()) else {
            return Err(not_found(name.as_str()));
        };

        if pending.polls_left > 0 {
            pending.polls_left -= 1;
        }
        if pending.polls_left > 0 {
            return Ok(Operation {
                name: name.clone(),
                done: false,
                error: None,
                response: None,
                metadata: None,
            });
        }

        Ok(finished(
            name.clone(),
            pending.response.clone(),
            pending.error.clone(),
        ))
    }
}
