//! Checkout route handlers.
//!
//! The whole flow happens inside the cart panel as HTMX fragment swaps:
//! cart view, details form, success view. The stage lives in the session and
//! every handler re-derives the fragment to show from it, so a stale or
//! replayed request never advances the flow twice.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use lima_rocha_core::{PaymentMethod, PickupShift};

use crate::checkout::{
    CheckoutForm, CheckoutStage, FlowError, LEAD_TIME_NOTICE, PICKUP_ADDRESS,
};
use crate::error::Result;
use crate::models::{load_cart, load_stage, save_cart, save_stage};
use crate::routes::cart::{CartPanelTemplate, CartView};
use crate::services::orders::{self, OrderError};
use crate::state::AppState;

/// Message shown when mandatory scheduling or payment fields are missing.
const MISSING_FIELDS_MESSAGE: &str =
    "Por favor, preencha todos os campos de agendamento e pagamento.";

/// Message shown when the order insert itself failed.
const SUBMIT_FAILED_MESSAGE: &str =
    "Não foi possível enviar seu pedido. Tente novamente em instantes.";

/// Message shown when a second submit races an in-flight one.
const SUBMIT_IN_FLIGHT_MESSAGE: &str = "Seu pedido está sendo enviado, aguarde um instante.";

/// A radio/select option for the checkout form.
#[derive(Clone)]
pub struct OptionView {
    pub value: String,
    pub label: &'static str,
    pub selected: bool,
}

/// Checkout form fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_form.html")]
pub struct CheckoutFormTemplate {
    pub name: String,
    pub whatsapp: String,
    pub pickup_date: String,
    /// Earliest selectable pickup date (today), for the date input's `min`.
    pub pickup_date_min: String,
    pub pickup_time: String,
    pub payment_options: Vec<OptionView>,
    pub shift_options: Vec<OptionView>,
    pub subtotal: String,
    pub pickup_address: &'static str,
    pub lead_time_notice: &'static str,
    pub error: Option<String>,
}

/// Checkout success fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/checkout_success.html")]
pub struct CheckoutSuccessTemplate {
    pub order_id: String,
}

impl CheckoutFormTemplate {
    /// Build the form fragment, carrying previously entered values so a
    /// rejected submission never wipes the customer's input.
    fn build(form: &CheckoutForm, subtotal: String, error: Option<String>) -> Self {
        Self {
            name: form.name.clone(),
            whatsapp: form.whatsapp.clone(),
            pickup_date: form.pickup_date.clone(),
            pickup_date_min: chrono::Local::now().date_naive().to_string(),
            pickup_time: form.pickup_time.clone(),
            payment_options: PaymentMethod::ALL
                .iter()
                .map(|method| OptionView {
                    value: method.to_string(),
                    label: method.label(),
                    selected: form.payment_method == method.to_string(),
                })
                .collect(),
            shift_options: PickupShift::ALL
                .iter()
                .map(|shift| OptionView {
                    value: shift.to_string(),
                    label: shift.label(),
                    selected: form.pickup_shift == shift.to_string(),
                })
                .collect(),
            subtotal,
            pickup_address: PICKUP_ADDRESS,
            lead_time_notice: LEAD_TIME_NOTICE,
            error,
        }
    }
}

/// Move from the cart view to the details form (HTMX).
///
/// With an empty cart the panel is re-rendered unchanged; the button is
/// disabled client-side but the transition is still refused here.
#[instrument(skip(session))]
pub async fn begin(session: Session) -> Result<Response> {
    let cart = load_cart(&session).await?;
    let stage = load_stage(&session).await?;

    match stage.begin(cart.is_empty()) {
        Ok(next) => {
            save_stage(&session, next).await?;
            Ok(CheckoutFormTemplate::build(
                &CheckoutForm::default(),
                cart.subtotal().display(),
                None,
            )
            .into_response())
        }
        Err(e) => {
            tracing::debug!("checkout begin refused: {e}");
            Ok(CartPanelTemplate {
                cart: CartView::from(&cart),
            }
            .into_response())
        }
    }
}

/// Move from the details form back to the cart view (HTMX).
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Response> {
    let stage = load_stage(&session).await?;

    match stage.back() {
        Ok(next) => save_stage(&session, next).await?,
        Err(e) => tracing::debug!("checkout back refused: {e}"),
    }

    let cart = load_cart(&session).await?;
    Ok(CartPanelTemplate {
        cart: CartView::from(&cart),
    }
    .into_response())
}

/// Submit the order (HTMX).
///
/// Validates the form, runs the two-step backend submission, and only then
/// clears the cart and shows the success view. Failures re-render the form
/// with the entered values and a message; a partial failure names the order
/// so the customer can reference it.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let cart = load_cart(&session).await?;
    let stage = load_stage(&session).await?;

    if stage != CheckoutStage::Details || cart.is_empty() {
        tracing::debug!(?stage, "submit refused: {}", FlowError::InvalidTransition(stage));
        save_stage(&session, CheckoutStage::Cart).await?;
        return Ok(CartPanelTemplate {
            cart: CartView::from(&cart),
        }
        .into_response());
    }

    let subtotal = cart.subtotal().display();

    let details = match form.validate() {
        Ok(details) => details,
        Err(e) => {
            tracing::debug!("checkout form rejected: {e}");
            return Ok(CheckoutFormTemplate::build(
                &form,
                subtotal,
                Some(MISSING_FIELDS_MESSAGE.to_string()),
            )
            .into_response());
        }
    };

    let session_id = session.id().map(|id| id.to_string()).unwrap_or_default();
    let Some(_guard) = state.try_begin_submission(&session_id) else {
        return Ok(CheckoutFormTemplate::build(
            &form,
            subtotal,
            Some(SUBMIT_IN_FLIGHT_MESSAGE.to_string()),
        )
        .into_response());
    };

    match orders::submit_order(state.supabase(), &cart, &details).await {
        Ok(order_id) => {
            let mut cart = cart;
            cart.clear();
            save_cart(&session, &cart).await?;
            save_stage(&session, stage.complete().unwrap_or(CheckoutStage::Success)).await?;

            Ok((
                AppendHeaders([("HX-Trigger", "cart-updated")]),
                CheckoutSuccessTemplate {
                    order_id: order_id.to_string(),
                },
            )
                .into_response())
        }
        Err(OrderError::Create(e)) => {
            tracing::error!("order creation failed: {e}");
            sentry::capture_error(&e);
            Ok(CheckoutFormTemplate::build(
                &form,
                subtotal,
                Some(SUBMIT_FAILED_MESSAGE.to_string()),
            )
            .into_response())
        }
        Err(e @ OrderError::Partial { order_id, .. }) => {
            tracing::error!("order {order_id} left without items: {e}");
            sentry::capture_error(&e);
            Ok(CheckoutFormTemplate::build(
                &form,
                subtotal,
                Some(format!(
                    "Seu pedido nº {order_id} foi registrado, mas houve um problema ao salvar os itens. Entre em contato pelo WhatsApp informando esse número."
                )),
            )
            .into_response())
        }
    }
}
