/// Popup UI: shorten the current tab and manage recent links

use crate::chrome::{
    ChromeClipboard, ChromeHttp, ChromeSettings, ChromeTabs, ChromeTimer, WindowDialog,
};
use crate::error::ShortenError;
use crate::link_data::ShortLink;
use crate::operations::PopupOperations;
use crate::ports::{DialogPort, SettingsPort, TimerPort};
use crate::settings::Settings;
use crate::ui::components::{LinkItem, StatusLine};
use crate::ui::state::{shorten_status, PopupAction, PopupState, PopupView, Status};
use patternfly_yew::prelude::*;
use std::rc::Rc;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

const COPIED_LABEL_MS: u32 = 2000;

/// Everything the popup needs from the browser
pub struct PopupServices {
    pub ops: PopupOperations,
    pub settings: Rc<dyn SettingsPort>,
    pub dialog: Rc<dyn DialogPort>,
    pub timer: Rc<dyn TimerPort>,
}

impl PopupServices {
    pub fn chrome() -> Self {
        PopupServices {
            ops: PopupOperations::new(
                Rc::new(ChromeHttp),
                Rc::new(ChromeTabs),
                Rc::new(ChromeClipboard),
            ),
            settings: Rc::new(ChromeSettings),
            dialog: Rc::new(WindowDialog),
            timer: Rc::new(ChromeTimer),
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let services = use_memo((), |_| PopupServices::chrome());
    let state = use_reducer(PopupState::default);
    let slug = use_state(String::new);

    // Load settings and follow later changes, on mount
    {
        let services = services.clone();
        let dispatcher = state.dispatcher();

        use_effect_with((), move |_| {
            let listener = dispatcher.clone();
            services.settings.subscribe(Box::new(move |change| {
                listener.dispatch(PopupAction::SettingsChanged(change));
            }));

            spawn_local(async move {
                match services.settings.load().await {
                    Ok(settings) => dispatcher.dispatch(PopupAction::SettingsLoaded(settings)),
                    Err(e) => {
                        log::error!("Failed to load settings: {}", e);
                        dispatcher.dispatch(PopupAction::SettingsLoaded(Settings::default()));
                        dispatcher.dispatch(PopupAction::SetStatus(Status::error(e.user_message())));
                    }
                }
            });
            || ()
        });
    }

    // (Re)load the list whenever the reducer asks for it
    {
        let services = services.clone();
        let dispatcher = state.dispatcher();
        let settings = state.settings.clone();
        let view = state.view;

        use_effect_with(state.reload_requested, move |_| {
            if view == PopupView::Authenticated {
                spawn_local(reload_links(services.ops.clone(), settings, dispatcher, false));
            }
            || ()
        });
    }

    let on_slug_input = {
        let slug = slug.clone();
        Callback::from(move |e: InputEvent| {
            if let Some(input) = e.target_dyn_into::<HtmlInputElement>() {
                slug.set(input.value());
            }
        })
    };

    let on_shorten = {
        let services = services.clone();
        let dispatcher = state.dispatcher();
        let settings = state.settings.clone();
        let slug = slug.clone();

        Callback::from(move |_| {
            if !settings.has_api_key() {
                dispatcher.dispatch(PopupAction::Failed(ShortenError::MissingApiKey));
                return;
            }

            let services = services.clone();
            let dispatcher = dispatcher.clone();
            let settings = settings.clone();
            let slug = slug.clone();
            let custom_slug = (*slug).clone();

            dispatcher.dispatch(PopupAction::ShortenStarted);

            spawn_local(async move {
                match services.ops.shorten_current_tab(&settings, &custom_slug).await {
                    Ok(report) => {
                        slug.set(String::new());
                        reload_links(services.ops.clone(), settings, dispatcher.clone(), true).await;
                        dispatcher.dispatch(PopupAction::ShortenFinished(shorten_status(&report)));
                    }
                    Err(e) => {
                        log::error!("Failed to shorten the current tab: {}", e);
                        dispatcher.dispatch(PopupAction::Failed(e));
                    }
                }
            });
        })
    };

    let on_refresh = {
        let services = services.clone();
        let dispatcher = state.dispatcher();
        let settings = state.settings.clone();

        Callback::from(move |_| {
            spawn_local(reload_links(services.ops.clone(), settings.clone(), dispatcher.clone(), false));
        })
    };

    let on_copy = {
        let services = services.clone();
        let dispatcher = state.dispatcher();

        Callback::from(move |link: ShortLink| {
            let services = services.clone();
            let dispatcher = dispatcher.clone();

            spawn_local(async move {
                match services.ops.copy(&link.link).await {
                    Ok(()) => {
                        dispatcher.dispatch(PopupAction::SetStatus(Status::success("Link copied to clipboard.")));
                        dispatcher.dispatch(PopupAction::RowCopied(link.id.clone()));

                        let expire = dispatcher.clone();
                        services.timer.schedule(
                            COPIED_LABEL_MS,
                            Box::new(move || expire.dispatch(PopupAction::RowCopyExpired(link.id))),
                        );
                    }
                    Err(_) => {
                        dispatcher.dispatch(PopupAction::SetStatus(Status::error("Could not copy the link.")));
                    }
                }
            });
        })
    };

    let on_stats = {
        let services = services.clone();
        let dispatcher = state.dispatcher();
        let settings = state.settings.clone();

        Callback::from(move |link: ShortLink| {
            let services = services.clone();
            let dispatcher = dispatcher.clone();
            let settings = settings.clone();

            spawn_local(async move {
                if let Err(e) = services.ops.open_stats(&settings, &link).await {
                    log::error!("Failed to open stats: {}", e);
                    dispatcher.dispatch(PopupAction::Failed(e));
                }
            });
        })
    };

    let on_delete = {
        let services = services.clone();
        let dispatcher = state.dispatcher();
        let settings = state.settings.clone();

        Callback::from(move |link: ShortLink| {
            if !services.dialog.confirm("Delete this link?") {
                return;
            }

            let services = services.clone();
            let dispatcher = dispatcher.clone();
            let settings = settings.clone();

            dispatcher.dispatch(PopupAction::DeleteStarted(link.id.clone()));

            spawn_local(async move {
                match services.ops.delete_link(&settings, &link.id).await {
                    Ok(()) => {
                        reload_links(services.ops.clone(), settings, dispatcher.clone(), false).await;
                        dispatcher.dispatch(PopupAction::SetStatus(Status::success("Link deleted.")));
                    }
                    Err(e) => dispatcher.dispatch(PopupAction::Failed(e)),
                }
                dispatcher.dispatch(PopupAction::DeleteFinished);
            });
        })
    };

    let on_open_options = {
        let services = services.clone();
        Callback::from(move |_| {
            let services = services.clone();
            spawn_local(async move {
                if let Err(e) = services.ops.open_options().await {
                    log::error!("Failed to open settings: {}", e);
                }
            });
        })
    };

    html! {
        <div class="popup padding-20">
            <div class="popup-header">
                <h1 class="popup-title">{"Kutt.it Link Manager"}</h1>
                <Button onclick={on_open_options.clone()} variant={ButtonVariant::Secondary} size={ButtonSize::Small}>
                    {"Settings"}
                </Button>
            </div>

            <StatusLine status={state.status.clone()} />

            {match state.view {
                PopupView::Loading => html! {
                    <div class="loading-text-center">
                        <Spinner />
                    </div>
                },
                PopupView::Unauthenticated => html! {
                    <section class="auth-info">
                        <p>{"Add the API key from your account settings to start shortening links."}</p>
                        <Button onclick={on_open_options} variant={ButtonVariant::Primary} block={true}>
                            {"Open settings"}
                        </Button>
                    </section>
                },
                PopupView::Authenticated => html! {
                    <>
                        <section class="shorten-tab flex-column-gap">
                            <input
                                type="text"
                                class="slug-input"
                                placeholder="Custom slug (optional)"
                                value={(*slug).clone()}
                                oninput={on_slug_input}
                                disabled={state.shortening}
                            />
                            <Button onclick={on_shorten} disabled={state.shortening} variant={ButtonVariant::Primary} block={true}>
                                {if state.shortening { "Creating…" } else { "Shorten this page" }}
                            </Button>
                        </section>

                        <section class="links">
                            <div class="links-header">
                                <h2 class="links-title">{"Recent links"}</h2>
                                <Button
                                    onclick={on_refresh}
                                    disabled={state.loading_links}
                                    variant={ButtonVariant::Secondary}
                                    size={ButtonSize::Small}
                                >
                                    {if state.loading_links { "…" } else { "⟳" }}
                                </Button>
                            </div>

                            if let Some(message) = state.empty_message() {
                                <p class="no-links">{message}</p>
                            }

                            <ul class="links-list">
                                {for state.rows.iter().map(|row| html! {
                                    <LinkItem
                                        key={row.link.id.clone()}
                                        row={row.clone()}
                                        copied={state.copied.as_deref() == Some(row.link.id.as_str())}
                                        deleting={state.deleting.as_deref() == Some(row.link.id.as_str())}
                                        on_copy={on_copy.clone()}
                                        on_stats={on_stats.clone()}
                                        on_delete={on_delete.clone()}
                                    />
                                })}
                            </ul>
                        </section>
                    </>
                },
            }}
        </div>
    }
}

// Helper functions

async fn reload_links(
    ops: PopupOperations,
    settings: Settings,
    dispatcher: UseReducerDispatcher<PopupState>,
    silent: bool,
) {
    dispatcher.dispatch(PopupAction::LinksLoading { silent });

    match ops.load_links(&settings).await {
        Ok(links) => dispatcher.dispatch(PopupAction::LinksLoaded { links, silent }),
        Err(e) => {
            log::error!("Failed to load links: {}", e);
            dispatcher.dispatch(PopupAction::LinksFailed(e));
        }
    }
}
