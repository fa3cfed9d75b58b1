//! Leptos application with routing.
//!
//! Dashboards are placeholders; only the auth flow is wired for real.

use leptos::*;
use leptos_router::*;

use astexo_auth::Capability;

use crate::frontend::context::{AuthProvider, use_auth};
use crate::frontend::gate::AuthGate;

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <AuthProvider>
                <Routes>
                    <Route path="/" view=LandingPage/>
                    <Route path="/admin/*any" view=AdminArea/>
                    <Route path="/client/*any" view=ClientArea/>
                </Routes>
            </AuthProvider>
        </Router>
    }
}

#[component]
fn LandingPage() -> impl IntoView {
    view! {
        <div class="app">
            <header>
                <h1>"Astexo"</h1>
            </header>
            <main>
                <LoginBox/>
            </main>
        </div>
    }
}

#[component]
fn AdminArea() -> impl IntoView {
    view! {
        <AuthGate required=Capability::AdminArea>
            <Dashboard title="Admin Dashboard"/>
        </AuthGate>
    }
}

#[component]
fn ClientArea() -> impl IntoView {
    view! {
        <AuthGate required=Capability::ClientArea>
            <Dashboard title="Client Dashboard"/>
        </AuthGate>
    }
}

#[component]
fn Dashboard(title: &'static str) -> impl IntoView {
    let auth = use_auth();
    let display_name = {
        let auth = auth.clone();
        move || auth.identity().map(|i| i.name).unwrap_or_default()
    };

    let on_logout = move |_| {
        let auth = auth.clone();
        spawn_local(async move { auth.logout().await });
    };

    view! {
        <div class="app">
            <header>
                <h1>{title}</h1>
                <span class="user">{display_name}</span>
                <button on:click=on_logout>"Log out"</button>
            </header>
        </div>
    }
}

/// Login form. A failed attempt shows one generic message and leaves the
/// form editable.
#[component]
fn LoginBox() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let error = create_rw_signal(None::<&'static str>);
    let is_submitting = create_rw_signal(false);

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get() {
            return;
        }

        is_submitting.set(true);
        error.set(None);

        let auth = auth.clone();
        let navigate = navigate.clone();
        let (email, password) = (email.get(), password.get());

        spawn_local(async move {
            let outcome = auth.login(&email, &password).await;
            is_submitting.set(false);
            match outcome.redirect_to {
                Some(target) if outcome.success => navigate(&target, Default::default()),
                _ => error.set(Some("Invalid email or password")),
            }
        });
    };

    view! {
        <form class="login-box" on:submit=submit>
            <h2>"Login to your account"</h2>
            <label for="email">"Email"</label>
            <input
                id="email"
                type="email"
                placeholder="m@example.com"
                required
                prop:value=move || email.get()
                on:input=move |ev| email.set(event_target_value(&ev))
            />
            <label for="password">"Password"</label>
            <input
                id="password"
                type="password"
                placeholder="Enter your password"
                required
                prop:value=move || password.get()
                on:input=move |ev| password.set(event_target_value(&ev))
            />
            {move || error.get().map(|msg| view! { <p class="error">{msg}</p> })}
            <button type="submit" disabled=move || is_submitting.get()>
                {move || if is_submitting.get() { "Logging in..." } else { "Login" }}
            </button>
        </form>
    }
}
