/// Options page: API key, instance URL and automation toggles

use crate::chrome::ChromeSettings;
use crate::ports::SettingsPort;
use crate::settings::OptionsForm;
use crate::ui::components::StatusLine;
use crate::ui::state::Status;
use patternfly_yew::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

#[function_component(OptionsPage)]
pub fn options_page() -> Html {
    let store = use_memo((), |_| ChromeSettings);
    let form = use_state(OptionsForm::default);
    let status = use_state(Status::none);

    // Fill the form from storage on mount
    {
        let store = store.clone();
        let form = form.clone();
        let status = status.clone();

        use_effect_with((), move |_| {
            spawn_local(async move {
                match store.load().await {
                    Ok(settings) => form.set(OptionsForm::from_settings(&settings)),
                    Err(e) => {
                        log::error!("Failed to load settings: {}", e);
                        status.set(Status::error(e.user_message()));
                    }
                }
            });
            || ()
        });
    }

    let on_text = |apply: fn(&mut OptionsForm, String)| {
        let form = form.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                apply(&mut next, input.value());
                form.set(next);
            }
        })
    };

    let on_toggle = |apply: fn(&mut OptionsForm, bool)| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                let mut next = (*form).clone();
                apply(&mut next, input.checked());
                form.set(next);
            }
        })
    };

    let on_submit = {
        let store = store.clone();
        let form = form.clone();
        let status = status.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();

            let settings = match form.validate() {
                Ok(settings) => settings,
                Err(e) => {
                    status.set(Status::error(e.user_message()));
                    return;
                }
            };

            // Show the normalized URL the popup and background will use
            form.set(OptionsForm::from_settings(&settings));
            status.set(Status::neutral("Saving…"));

            let store = store.clone();
            let status = status.clone();
            spawn_local(async move {
                match store.save(&settings).await {
                    Ok(()) => status.set(Status::success("Settings saved.")),
                    Err(e) => {
                        log::error!("Failed to save settings: {}", e);
                        status.set(Status::error(e.user_message()));
                    }
                }
            });
        })
    };

    let on_clear = {
        let store = store.clone();
        let form = form.clone();
        let status = status.clone();

        Callback::from(move |_| {
            let store = store.clone();
            let form = form.clone();
            let status = status.clone();

            spawn_local(async move {
                match store.clear().await {
                    Ok(()) => {
                        form.set(OptionsForm::default());
                        status.set(Status::success("Settings cleared."));
                    }
                    Err(e) => {
                        log::error!("Failed to clear settings: {}", e);
                        status.set(Status::error(e.user_message()));
                    }
                }
            });
        })
    };

    html! {
        <div class="container">
            <h1 class="main-title">{"Kutt.it Link Manager Settings"}</h1>

            <form class="settings-form flex-column-gap" onsubmit={on_submit}>
                <label for="base-url">{"Instance URL"}</label>
                <input
                    id="base-url"
                    type="text"
                    placeholder="https://kutt.it"
                    value={form.base_url.clone()}
                    oninput={on_text(|form, value| form.base_url = value)}
                />

                <label for="api-key">{"API key"}</label>
                <input
                    id="api-key"
                    type="password"
                    value={form.api_key.clone()}
                    oninput={on_text(|form, value| form.api_key = value)}
                />

                <label class="checkbox">
                    <input
                        type="checkbox"
                        checked={form.auto_copy}
                        onchange={on_toggle(|form, checked| form.auto_copy = checked)}
                    />
                    {"Copy new short links to the clipboard"}
                </label>

                <label class="checkbox">
                    <input
                        type="checkbox"
                        checked={form.auto_open_stats}
                        onchange={on_toggle(|form, checked| form.auto_open_stats = checked)}
                    />
                    {"Open the stats page after shortening"}
                </label>

                <div class="form-actions">
                    <button type="submit" class="pf-v5-c-button pf-m-primary">{"Save"}</button>
                    <Button onclick={on_clear} variant={ButtonVariant::Secondary}>
                        {"Clear"}
                    </Button>
                </div>
            </form>

            <StatusLine status={(*status).clone()} />
        </div>
    }
}
