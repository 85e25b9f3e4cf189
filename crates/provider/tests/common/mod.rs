//! In-memory cloud.ca used by the provider tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cloudca_common::{
    Error, NetworkAcl, NetworkAclService, PublicIp, PublicIpService, ResourceLocator, Resources,
    Result,
};
use cloudca_provider::state::{make_state, string_value};
use cloudca_provider::DynamicValue;

pub const SERVICE_CODE: &str = "compute-on";
pub const ENVIRONMENT: &str = "dev";

#[derive(Default)]
struct CloudState {
    acls: HashMap<String, NetworkAcl>,
    ips: HashMap<String, PublicIp>,
    next_id: u64,
    fail_next: Option<u16>,
    lookups: usize,
}

impl CloudState {
    fn take_failure(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(status) => Err(Error::Api { status, errors: vec![] }),
            None => Ok(()),
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Clone, Default)]
pub struct FakeCloud {
    state: Arc<Mutex<CloudState>>,
}

impl FakeCloud {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next remote call fails with the given HTTP status
    pub fn fail_next(&self, status: u16) {
        self.state.lock().unwrap().fail_next = Some(status);
    }

    /// Simulate removal outside of Terraform
    pub fn remove_acl(&self, id: &str) {
        self.state.lock().unwrap().acls.remove(id);
    }

    pub fn remove_ip(&self, id: &str) {
        self.state.lock().unwrap().ips.remove(id);
    }

    pub fn acl_count(&self) -> usize {
        self.state.lock().unwrap().acls.len()
    }

    pub fn ip_count(&self) -> usize {
        self.state.lock().unwrap().ips.len()
    }

    pub fn lookups(&self) -> usize {
        self.state.lock().unwrap().lookups
    }
}

#[async_trait]
impl ResourceLocator for FakeCloud {
    async fn resources(&self, service_code: &str, environment_name: &str) -> Result<Resources> {
        self.state.lock().unwrap().lookups += 1;
        if service_code != SERVICE_CODE {
            return Err(Error::UnknownService(service_code.to_string()));
        }
        if environment_name != ENVIRONMENT {
            return Err(Error::UnknownEnvironment {
                service_code: service_code.to_string(),
                environment: environment_name.to_string(),
            });
        }
        Ok(Resources {
            network_acls: Arc::new(FakeAcls(self.clone())),
            public_ips: Arc::new(FakeIps(self.clone())),
        })
    }
}

struct FakeAcls(FakeCloud);

#[async_trait]
impl NetworkAclService for FakeAcls {
    async fn get(&self, id: &str) -> Result<NetworkAcl> {
        let mut state = self.0.state.lock().unwrap();
        state.take_failure()?;
        state.acls.get(id).cloned().ok_or_else(|| Error::NotFound {
            kind: "network ACL".to_string(),
            id: id.to_string(),
        })
    }

    async fn create(&self, acl: &NetworkAcl) -> Result<NetworkAcl> {
        let mut state = self.0.state.lock().unwrap();
        state.take_failure()?;
        let created = NetworkAcl {
            id: state.next_id("acl"),
            ..acl.clone()
        };
        state.acls.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut state = self.0.state.lock().unwrap();
        state.take_failure()?;
        state.acls.remove(id).map(|_| true).ok_or_else(|| Error::NotFound {
            kind: "network ACL".to_string(),
            id: id.to_string(),
        })
    }
}

struct FakeIps(FakeCloud);

#[async_trait]
impl PublicIpService for FakeIps {
    async fn get(&self, id: &str) -> Result<PublicIp> {
        let mut state = self.0.state.lock().unwrap();
        state.take_failure()?;
        state.ips.get(id).cloned().ok_or_else(|| Error::NotFound {
            kind: "public IP".to_string(),
            id: id.to_string(),
        })
    }

    async fn create(&self, ip: &PublicIp) -> Result<PublicIp> {
        let mut state = self.0.state.lock().unwrap();
        state.take_failure()?;
        let id = state.next_id("ip");
        let created = PublicIp {
            ip_address: format!("69.196.164.{}", state.next_id),
            id,
            ..ip.clone()
        };
        state.ips.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut state = self.0.state.lock().unwrap();
        state.take_failure()?;
        state.ips.remove(id).map(|_| true).ok_or_else(|| Error::NotFound {
            kind: "public IP".to_string(),
            id: id.to_string(),
        })
    }
}

pub fn acl_config(name: &str, description: &str, vpc_id: &str) -> DynamicValue {
    make_state(vec![
        ("service_code", string_value(SERVICE_CODE)),
        ("environment_name", string_value(ENVIRONMENT)),
        ("name", string_value(name)),
        ("description", string_value(description)),
        ("vpc_id", string_value(vpc_id)),
    ])
}

pub fn public_ip_config(vpc_id: &str) -> DynamicValue {
    make_state(vec![
        ("service_code", string_value(SERVICE_CODE)),
        ("environment_name", string_value(ENVIRONMENT)),
        ("vpc_id", string_value(vpc_id)),
    ])
}
