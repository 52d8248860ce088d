use retrodesk_core::Translate;
use yew::prelude::*;

use crate::games::{self, GameKind};
use crate::strings::English;

#[derive(Properties, Clone, Debug, PartialEq)]
pub(crate) struct AppProps {
    /// Forced seed from the location hash.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Open(GameKind),
    Close,
}

/// Game picker. At most one game is mounted at a time, closing it unmounts the view.
#[derive(Debug)]
pub(crate) struct App {
    open: Option<GameKind>,
}

impl Component for App {
    type Message = Msg;
    type Properties = AppProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self { open: None }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Open(kind) => {
                log::debug!("Opening {:?}", kind);
                self.open.replace(kind) != Some(kind)
            }
            Msg::Close => {
                log::debug!("Closing {:?}", self.open);
                self.open.take().is_some()
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let seed = ctx.props().seed;
        let launcher = GameKind::ALL.iter().map(|&kind| {
            let onclick = ctx.link().callback(move |_: MouseEvent| Msg::Open(kind));
            let class = classes!("launcher", kind.css_class(), (self.open == Some(kind)).then_some("active"));
            html! {
                <li><button {class} {onclick}>{English.t(kind.title_key())}</button></li>
            }
        });

        let window = self.open.map(|kind| {
            let on_close = ctx.link().callback(|_: MouseEvent| Msg::Close);
            html! {
                <section class={classes!("window", kind.css_class())}>
                    <header>
                        <h2>{English.t(kind.title_key())}</h2>
                        <button class="close" onclick={on_close} title={English.t("shell.close")}>{"×"}</button>
                    </header>
                    {games::view(kind, seed)}
                </section>
            }
        });

        html! {
            <main class="retrodesk">
                <nav>
                    <h1>{English.t("shell.title")}</h1>
                    <ul>{for launcher}</ul>
                </nav>
                {for window}
            </main>
        }
    }
}
