use retrodesk_core::minesweeper::{Difficulty, FirstMovePolicy};
use retrodesk_core::Translate;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

use crate::strings::English;
use crate::utils::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct MinesweeperSettings {
    pub difficulty: Difficulty,
    pub policy: FirstMovePolicy,
}

impl StorageKey for MinesweeperSettings {
    const KEY: &'static str = "retrodesk:minesweeper:settings";
}

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct SettingsProps {
    pub open: bool,
    pub on_close: Callback<()>,
    /// Receives the new settings, which are already saved.
    pub on_apply: Callback<MinesweeperSettings>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let draft = use_state(MinesweeperSettings::local_or_default);

    let preset_buttons = Difficulty::PRESETS.iter().map(|&(key, difficulty)| {
        let draft = draft.clone();
        let checked = draft.difficulty == difficulty;
        let onchange = Callback::from(move |_: Event| {
            draft.set(MinesweeperSettings {
                difficulty,
                ..*draft
            });
        });
        html! {
            <label>
                <input type="radio" name="difficulty" {checked} {onchange}/>
                {English.t(key)}
            </label>
        }
    });

    let zero_start = draft.policy == FirstMovePolicy::ZeroCell;
    let on_toggle_zero = {
        let draft = draft.clone();
        Callback::from(move |_: Event| {
            let policy = match draft.policy {
                FirstMovePolicy::ZeroCell => FirstMovePolicy::SafeCell,
                FirstMovePolicy::SafeCell => FirstMovePolicy::ZeroCell,
            };
            draft.set(MinesweeperSettings { policy, ..*draft });
        })
    };

    let on_apply = {
        let draft = draft.clone();
        let on_apply = props.on_apply.clone();
        Callback::from(move |_: MouseEvent| {
            draft.local_save();
            log::debug!("Minesweeper settings: {:?}", *draft);
            on_apply.emit(*draft);
        })
    };
    let on_cancel = {
        let draft = draft.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| {
            draft.set(MinesweeperSettings::local_or_default());
            on_close.emit(());
        })
    };

    html! {
        <dialog class="settings" open={props.open}>
            <article>
                <h2>{English.t("action.settings")}</h2>
                <fieldset>{for preset_buttons}</fieldset>
                <label>
                    <input type="checkbox" checked={zero_start} onchange={on_toggle_zero}/>
                    {English.t("minesweeper.settings.zeroStart")}
                </label>
                <footer>
                    <button type="reset" onclick={on_cancel}>{English.t("action.cancel")}</button>
                    <button onclick={on_apply}>{English.t("action.apply")}</button>
                </footer>
            </article>
        </dialog>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_beginner_with_a_safe_start() {
        let settings = MinesweeperSettings::default();
        assert_eq!(settings.difficulty, Difficulty::BEGINNER);
        assert_eq!(settings.policy, FirstMovePolicy::SafeCell);
        assert_eq!(
            <MinesweeperSettings as StorageKey>::KEY,
            "retrodesk:minesweeper:settings"
        );
    }
}
