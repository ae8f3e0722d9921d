//! Taskboard Frontend Entry Point

#[cfg(target_arch = "wasm32")]
fn main() {
    use leptos::prelude::*;
    use taskboard_ui::app::App;
    use taskboard_ui::config::AppConfig;
    use taskboard_ui::context::Services;

    console_error_panic_hook::set_once();
    let config = AppConfig::from_build_env();
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new().set_max_level(config.log_level).build(),
    );
    tracing::info!(api = %config.api_base_url, "starting taskboard");

    let services = Services::browser(config);
    mount_to_body(move || view! { <App services=services /> });
}

/// The app only runs in the browser; native builds exist for the test suite
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("taskboard-ui runs in the browser; build it for wasm32-unknown-unknown");
}
