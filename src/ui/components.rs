/// Reusable UI components

use crate::link_data::ShortLink;
use crate::ui::state::{LinkRow, Status, StatusKind};
use patternfly_yew::prelude::*;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatusLineProps {
    pub status: Status,
}

#[function_component(StatusLine)]
pub fn status_line(props: &StatusLineProps) -> Html {
    if props.status.is_empty() {
        return html! {};
    }

    let alert_type = match props.status.kind {
        StatusKind::Neutral => AlertType::Info,
        StatusKind::Success => AlertType::Success,
        StatusKind::Error => AlertType::Danger,
    };

    html! {
        <div class="status-line">
            <Alert r#type={alert_type} title={props.status.message.clone()} inline={true}>
            </Alert>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LinkItemProps {
    pub row: LinkRow,
    #[prop_or(false)]
    pub copied: bool,
    #[prop_or(false)]
    pub deleting: bool,
    pub on_copy: Callback<ShortLink>,
    pub on_stats: Callback<ShortLink>,
    pub on_delete: Callback<ShortLink>,
}

#[function_component(LinkItem)]
pub fn link_item(props: &LinkItemProps) -> Html {
    let row = &props.row;
    let link = row.link.clone();

    html! {
        <li class="link-item">
            <div class="link-content">
                <a class="short-link" href={row.href.clone()} target="_blank" rel="noopener noreferrer">
                    {&row.link.link}
                </a>
                <div class="long-link" title={row.link.target.clone()}>
                    {&row.link.target}
                </div>
                <div class="created">{&row.created}</div>
            </div>
            <div class="link-actions">
                <Button
                    onclick={props.on_copy.reform({
                        let link = link.clone();
                        move |_| link.clone()
                    })}
                    variant={ButtonVariant::Secondary}
                    size={ButtonSize::Small}
                >
                    {if props.copied { "Copied!" } else { "Copy" }}
                </Button>
                <Button
                    onclick={props.on_stats.reform({
                        let link = link.clone();
                        move |_| link.clone()
                    })}
                    variant={ButtonVariant::Secondary}
                    size={ButtonSize::Small}
                >
                    {"Stats"}
                </Button>
                <Button
                    onclick={props.on_delete.reform(move |_| link.clone())}
                    disabled={props.deleting}
                    variant={ButtonVariant::Danger}
                    size={ButtonSize::Small}
                >
                    {if props.deleting { "Deleting…" } else { "Delete" }}
                </Button>
            </div>
        </li>
    }
}
