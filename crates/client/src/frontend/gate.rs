//! `<AuthGate>`: renders protected content only after the client-side
//! re-check passes.

use leptos::*;
use leptos_router::use_navigate;

use astexo_auth::Capability;

use crate::frontend::context::use_auth;
use crate::gate::GateDecision;

#[component]
pub fn AuthGate(
    /// Area the wrapped view belongs to; `None` only requires a session.
    #[prop(optional)]
    required: Option<Capability>,
    children: ChildrenFn,
) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let decision = create_memo(move |_| auth.decision(required));

    create_effect(move |_| {
        if let GateDecision::Redirect(target) = decision.get() {
            navigate(target, Default::default());
        }
    });

    move || match decision.get() {
        GateDecision::Wait => view! { <Waiting/> }.into_view(),
        GateDecision::Redirect(_) => view! { <AccessDenied/> }.into_view(),
        GateDecision::Render => children().into_view(),
    }
}

#[component]
fn Waiting() -> impl IntoView {
    view! {
        <div class="auth-gate waiting">
            <h2>"Loading Dashboard"</h2>
            <p>"Please wait while we load your dashboard..."</p>
        </div>
    }
}

#[component]
fn AccessDenied() -> impl IntoView {
    view! {
        <div class="auth-gate denied">
            <h2>"Access Denied"</h2>
            <p>"Please log in to access your dashboard."</p>
        </div>
    }
}
