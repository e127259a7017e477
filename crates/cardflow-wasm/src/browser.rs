//! Browser glue: Stripe.js bindings and the `WasmWorkflow` class.
//!
//! ```javascript
//! import init, { WasmWorkflow } from 'cardflow-wasm';
//!
//! await init();
//!
//! const workflow = new WasmWorkflow('#payment-element', render);
//! await workflow.loadConfig();
//! await workflow.startSaveFlow();
//! // ... user fills in the card form ...
//! await workflow.submitCard();
//! await workflow.charge('10.00');
//! ```

use crate::controller::{Action, CustomerProfile, Workflow, WorkflowError};
use crate::relay::HttpRelayClient;
use crate::widget::{CardWidget, WidgetError, WidgetOutcome, RETURN_PATH};
use crate::workflow::WorkflowView;
use async_trait::async_trait;
use js_sys::{Object, Promise, Reflect};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, JsFuture};

#[wasm_bindgen]
extern "C" {
    /// Stripe.js client handle
    #[wasm_bindgen(js_name = Stripe, js_namespace = window)]
    #[derive(Debug, Clone)]
    type JsStripe;

    #[wasm_bindgen(js_name = Elements)]
    #[derive(Debug, Clone)]
    type JsElements;

    #[wasm_bindgen(js_name = PaymentElement)]
    #[derive(Debug, Clone)]
    type JsPaymentElement;

    /// `Stripe(publishableKey)`
    #[wasm_bindgen(catch, js_name = Stripe, js_namespace = window)]
    fn new_stripe(publishable_key: &str) -> Result<JsStripe, JsValue>;

    /// `stripe.elements({ clientSecret })`
    #[wasm_bindgen(method, catch)]
    fn elements(this: &JsStripe, options: &JsValue) -> Result<JsElements, JsValue>;

    /// `elements.create("payment")`
    #[wasm_bindgen(method, catch, js_name = create)]
    fn create_element(this: &JsElements, element_type: &str)
        -> Result<JsPaymentElement, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn mount(this: &JsPaymentElement, selector: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch)]
    fn unmount(this: &JsPaymentElement) -> Result<(), JsValue>;

    /// `stripe.confirmSetup({ elements, confirmParams, redirect })`
    #[wasm_bindgen(method, catch, js_name = confirmSetup)]
    fn confirm_setup(this: &JsStripe, options: &JsValue) -> Result<Promise, JsValue>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ElementsOptions<'a> {
    client_secret: &'a str,
}

/// Best-effort text of a thrown JS value
fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            Reflect::get(value, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

fn set(target: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(target, &JsValue::from_str(key), value).map(|_| ())
}

fn page_origin() -> Result<String, JsValue> {
    web_sys::window()
        .ok_or_else(|| JsValue::from_str("No window available"))?
        .location()
        .origin()
}

/// Stripe Payment Element mounted at a CSS selector
pub struct StripeCardWidget {
    selector: String,
    stripe: Option<(String, JsStripe)>,
    mounted: Option<(JsElements, JsPaymentElement)>,
}

impl StripeCardWidget {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            stripe: None,
            mounted: None,
        }
    }

    /// Stripe.js handle for the key, created once per key
    fn stripe(&mut self, publishable_key: &str) -> Result<JsStripe, JsValue> {
        if let Some((key, stripe)) = &self.stripe {
            if key == publishable_key {
                return Ok(stripe.clone());
            }
        }
        let stripe = new_stripe(publishable_key)?;
        self.stripe = Some((publishable_key.to_string(), stripe.clone()));
        Ok(stripe)
    }

    fn try_mount(
        &mut self,
        publishable_key: &str,
        client_secret: &str,
    ) -> Result<(JsElements, JsPaymentElement), JsValue> {
        let stripe = self.stripe(publishable_key)?;
        let options = serde_wasm_bindgen::to_value(&ElementsOptions { client_secret })?;
        let elements = stripe.elements(&options)?;
        let element = elements.create_element("payment")?;
        element.mount(&self.selector)?;
        Ok((elements, element))
    }

    fn confirm_options(&self, elements: &JsElements) -> Result<JsValue, JsValue> {
        let return_url = format!("{}{}", page_origin()?, RETURN_PATH);

        let confirm_params = Object::new();
        set(&confirm_params, "return_url", &JsValue::from_str(&return_url))?;

        let options = Object::new();
        set(&options, "elements", elements.as_ref())?;
        set(&options, "confirmParams", &confirm_params)?;
        set(&options, "redirect", &JsValue::from_str("if_required"))?;
        Ok(options.into())
    }
}

#[async_trait(?Send)]
impl CardWidget for StripeCardWidget {
    fn mount(&mut self, publishable_key: &str, client_secret: &str) -> Result<(), WidgetError> {
        self.unmount();

        let mounted = self
            .try_mount(publishable_key, client_secret)
            .map_err(|e| WidgetError(js_message(&e)))?;
        self.mounted = Some(mounted);
        Ok(())
    }

    async fn confirm(&mut self) -> WidgetOutcome {
        let (Some((_, stripe)), Some((elements, _))) = (&self.stripe, &self.mounted) else {
            return WidgetOutcome::Failed("Card form is not ready".to_string());
        };

        let promise = match self
            .confirm_options(elements)
            .and_then(|options| stripe.confirm_setup(&options))
        {
            Ok(promise) => promise,
            Err(e) => return WidgetOutcome::Failed(js_message(&e)),
        };

        let result = match JsFuture::from(promise).await {
            Ok(result) => result,
            Err(e) => return WidgetOutcome::Failed(js_message(&e)),
        };

        let error =
            Reflect::get(&result, &JsValue::from_str("error")).unwrap_or(JsValue::UNDEFINED);
        if !error.is_undefined() && !error.is_null() {
            let message = Reflect::get(&error, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
                .unwrap_or_else(|| "Failed to save card".to_string());
            return WidgetOutcome::Failed(message);
        }

        let status = Reflect::get(&result, &JsValue::from_str("setupIntent"))
            .and_then(|intent| Reflect::get(&intent, &JsValue::from_str("status")))
            .ok()
            .and_then(|s| s.as_string())
            .unwrap_or_default();

        if status == "succeeded" {
            WidgetOutcome::Confirmed
        } else {
            WidgetOutcome::Failed(format!("Card setup ended in status {}", status))
        }
    }

    fn unmount(&mut self) {
        if let Some((_, element)) = self.mounted.take() {
            if let Err(e) = element.unmount() {
                web_sys::console::warn_1(&JsValue::from_str(&js_message(&e)));
            }
        }
    }
}

type BrowserWorkflow = Workflow<HttpRelayClient, StripeCardWidget>;

/// The save → display → charge → replace workflow, driven from JavaScript.
///
/// Each action returns a promise. A second action while one is still running
/// is rejected.
#[wasm_bindgen]
pub struct WasmWorkflow {
    inner: Rc<RefCell<Option<BrowserWorkflow>>>,
    view: Rc<RefCell<WorkflowView>>,
}

#[wasm_bindgen]
impl WasmWorkflow {
    /// `onChange` receives the serialized view after every transition
    #[wasm_bindgen(constructor)]
    pub fn new(
        mount_selector: String,
        on_change: js_sys::Function,
        email: Option<String>,
        name: Option<String>,
    ) -> Result<WasmWorkflow, JsValue> {
        let defaults = CustomerProfile::default();
        let profile = CustomerProfile {
            email: email.unwrap_or(defaults.email),
            name: name.unwrap_or(defaults.name),
        };

        let view = Rc::new(RefCell::new(WorkflowView::default()));
        let latest = view.clone();

        let workflow = Workflow::new(
            HttpRelayClient::new(page_origin()?),
            StripeCardWidget::new(mount_selector),
        )
        .with_profile(profile)
        .with_observer(move |state| {
            let next = WorkflowView::from(state);
            match serde_wasm_bindgen::to_value(&next) {
                Ok(value) => {
                    if let Err(e) = on_change.call1(&JsValue::NULL, &value) {
                        web_sys::console::error_1(&e);
                    }
                }
                Err(e) => web_sys::console::error_1(&JsValue::from_str(&e.to_string())),
            }
            *latest.borrow_mut() = next;
        });

        Ok(Self {
            inner: Rc::new(RefCell::new(Some(workflow))),
            view,
        })
    }

    /// Current render model
    pub fn view(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&*self.view.borrow()).map_err(Into::into)
    }

    #[wasm_bindgen(js_name = loadConfig)]
    pub fn load_config(&self) -> Promise {
        self.dispatch(Action::LoadConfig)
    }

    #[wasm_bindgen(js_name = startSaveFlow)]
    pub fn start_save_flow(&self) -> Promise {
        self.dispatch(Action::StartSaveFlow)
    }

    #[wasm_bindgen(js_name = submitCard)]
    pub fn submit_card(&self) -> Promise {
        self.dispatch(Action::SubmitCard)
    }

    #[wasm_bindgen(js_name = changeCard)]
    pub fn change_card(&self) -> Promise {
        self.dispatch(Action::ChangeCard)
    }

    #[wasm_bindgen(js_name = cancelChange)]
    pub fn cancel_change(&self) -> Promise {
        self.dispatch(Action::CancelChange)
    }

    #[wasm_bindgen(js_name = removeCard)]
    pub fn remove_card(&self) -> Promise {
        self.dispatch(Action::RemoveCard)
    }

    pub fn charge(&self, amount: String) -> Promise {
        self.dispatch(Action::Charge { amount })
    }

    /// Run one action with the workflow checked out of its slot
    fn dispatch(&self, action: Action) -> Promise {
        let slot = self.inner.clone();

        future_to_promise(async move {
            let mut workflow = slot
                .borrow_mut()
                .take()
                .ok_or_else(|| JsValue::from_str(&WorkflowError::Busy.to_string()))?;

            let result = workflow.apply(action).await;
            *slot.borrow_mut() = Some(workflow);

            result
                .map(|_| JsValue::UNDEFINED)
                .map_err(|e| JsValue::from_str(&e.to_string()))
        })
    }
}
