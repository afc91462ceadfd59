//! What cards ask of the host, and the capability that carries it out.

use muthur_core::prelude::*;
use muthur_core::ServiceCall;
use muthur_hass::HassHandle;

/// A request raised by a card interaction.
#[derive(Debug, Clone, PartialEq)]
pub enum HostRequest {
    /// Change entity state through a service call.
    CallService(ServiceCall),
    /// Show the detail view for one entity.
    ShowDetail { entity_id: String },
    /// Switch to the dashboard view at `path`.
    Navigate { path: String },
    /// Open an external URL in the user's browser.
    OpenUrl { url: String },
}

/// The host's service-call capability.
///
/// Implemented by [`HassHandle`] for a live connection; tests use a recording
/// fake.
#[trait_variant::make(ServiceCaller: Send)]
pub trait LocalServiceCaller {
    /// Ask the host to run `call`. Resolves once the host accepted or
    /// rejected it.
    async fn call_service(&self, call: ServiceCall) -> Result<()>;
}

impl ServiceCaller for HassHandle {
    async fn call_service(&self, call: ServiceCall) -> Result<()> {
        HassHandle::call_service(self, &call).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every call; rejects calls whose `code` is in `reject_codes`.
    #[derive(Clone, Default)]
    pub struct RecordingCaller {
        pub calls: Arc<Mutex<Vec<ServiceCall>>>,
        pub reject_codes: Vec<String>,
    }

    impl RecordingCaller {
        pub fn rejecting(code: &str) -> Self {
            Self {
                reject_codes: vec![code.to_string()],
                ..Self::default()
            }
        }

        pub fn recorded(&self) -> Vec<ServiceCall> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl ServiceCaller for RecordingCaller {
        async fn call_service(&self, call: ServiceCall) -> Result<()> {
            let code = call
                .service_data
                .get("code")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            self.calls.lock().unwrap().push(call);
            match code {
                Some(code) if self.reject_codes.contains(&code) => Err(Error::service_rejected(
                    "home_assistant_error",
                    "Invalid alarm code",
                )),
                _ => Ok(()),
            }
        }
    }

    #[tokio::test]
    async fn test_recording_caller_records_and_rejects() {
        let caller = RecordingCaller::rejecting("0000");
        let ok = ServiceCall::for_entity("alarm_control_panel.hq", "alarm_disarm").with("code", "1234");
        let bad = ServiceCall::for_entity("alarm_control_panel.hq", "alarm_disarm").with("code", "0000");

        assert!(ServiceCaller::call_service(&caller, ok).await.is_ok());
        assert!(ServiceCaller::call_service(&caller, bad).await.is_err());
        assert_eq!(caller.recorded().len(), 2);
    }
}
