use retrodesk_core::solitaire::{AutoMove, Card, CardId, Color, PileId, Solitaire, DRAW_COUNT};
use retrodesk_core::{StatusText, Translate};
use yew::prelude::*;

use super::GameProps;
use crate::strings::English;
use crate::utils::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Draw,
    CardClick(CardId, PileId),
    PileClick(PileId),
    Undo,
    AutoComplete,
    NewGame,
}

/// Selection for a click-to-move: first click picks a card, second click picks the pile.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Selected {
    card: CardId,
    source: PileId,
}

#[derive(Properties, Clone, PartialEq)]
struct CardProps {
    card: Card,
    pile: PileId,
    #[prop_or_default]
    selected: bool,
    /// Only set for cards that react to clicks.
    #[prop_or_default]
    onclick: Option<Callback<Msg>>,
}

#[function_component(CardView)]
fn card_component(props: &CardProps) -> Html {
    let CardProps {
        card,
        pile,
        selected,
        onclick,
    } = props.clone();

    if !card.face_up {
        return html! { <div class="card back"/> };
    }

    let class = classes!(
        "card",
        match card.color() {
            Color::Red => "red",
            Color::Black => "black",
        },
        selected.then_some("selected")
    );
    let onclick = onclick.map(|callback| {
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            callback.emit(Msg::CardClick(card.id(), pile));
        })
    });

    html! { <div {class} {onclick}>{card.label()}</div> }
}

pub(crate) struct SolitaireView {
    game: Solitaire,
    seed: Option<u64>,
    selected: Option<Selected>,
}

impl SolitaireView {
    fn on_card(&mut self, card: CardId, source: PileId) -> bool {
        match self.selected {
            Some(selected) if selected.card == card => self.selected.take().is_some(),
            Some(_) => self.on_pile(source),
            None => match self.game.try_auto_move(card, source) {
                Ok(AutoMove::Moved(foundation)) => {
                    log::debug!("Card {} played to {:?}", card, foundation);
                    true
                }
                Ok(AutoMove::Drag) => {
                    self.selected = Some(Selected { card, source });
                    true
                }
                Err(err) => {
                    log::trace!("Card {} not playable: {}", card, err);
                    false
                }
            },
        }
    }

    fn on_pile(&mut self, destination: PileId) -> bool {
        match self.selected.take() {
            Some(Selected { card, source }) => {
                log_rejection("move", self.game.try_move(card, source, destination));
                true
            }
            None => false,
        }
    }

    fn view_pile(&self, ctx: &Context<Self>, pile: PileId) -> Html {
        let cards = self.game.pile(pile);
        let on_card = ctx.link().callback(|msg: Msg| msg);
        let on_pile = ctx.link().callback(move |_: MouseEvent| Msg::PileClick(pile));
        let is_selected = |card: &Card| {
            self.selected
                .is_some_and(|selected| selected.card == card.id())
        };

        let shown: Vec<Html> = match pile {
            // the pile itself handles stock clicks, including the recycle on an empty stock
            PileId::Stock => cards
                .last()
                .map(|_| html! { <div class="card back"/> })
                .into_iter()
                .collect(),
            PileId::Waste | PileId::Foundation(_) => {
                let visible = if pile == PileId::Waste { DRAW_COUNT } else { 1 };
                let start = cards.len().saturating_sub(visible);
                let top = cards.len().saturating_sub(1);
                cards[start..]
                    .iter()
                    .enumerate()
                    .map(|(i, &card)| {
                        let onclick = (start + i == top).then(|| on_card.clone());
                        html! { <CardView {card} {pile} selected={is_selected(&card)} {onclick}/> }
                    })
                    .collect()
            }
            PileId::Tableau(_) => cards
                .iter()
                .map(|&card| {
                    let onclick = card.face_up.then(|| on_card.clone());
                    html! { <CardView {card} {pile} selected={is_selected(&card)} {onclick}/> }
                })
                .collect(),
        };

        let class = classes!(
            "pile",
            match pile {
                PileId::Stock => "stock",
                PileId::Waste => "waste",
                PileId::Foundation(_) => "foundation",
                PileId::Tableau(_) => "column",
            },
            cards.is_empty().then_some("empty")
        );
        let onclick = match pile {
            PileId::Stock => ctx.link().callback(|_: MouseEvent| Msg::Draw),
            _ => on_pile,
        };

        html! { <div {class} {onclick}>{for shown}</div> }
    }
}

impl Component for SolitaireView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let seed = ctx.props().seed;
        Self {
            game: Solitaire::new(seed_or_random(seed)),
            seed,
            selected: None,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Draw => {
                self.selected = None;
                log_rejection("draw", self.game.draw_from_stock())
            }
            CardClick(card, pile) => self.on_card(card, pile),
            PileClick(pile) => self.on_pile(pile),
            Undo => {
                self.selected = None;
                match self.game.undo() {
                    Ok(undone) => undone,
                    Err(err) => {
                        log::trace!("undo rejected: {}", err);
                        false
                    }
                }
            }
            AutoComplete => {
                self.selected = None;
                log_rejection("auto-complete", self.game.auto_complete())
            }
            NewGame => {
                self.selected = None;
                self.game.new_game(seed_or_random(self.seed));
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let foundations = PileId::foundations().map(|pile| self.view_pile(ctx, pile));
        let tableau = PileId::tableau().map(|pile| self.view_pile(ctx, pile));
        let moves = format_for_counter(self.game.move_count() as i32);

        html! {
            <div class="solitaire">
                <nav>
                    <button onclick={ctx.link().callback(|_: MouseEvent| NewGame)}>{English.t("action.newGame")}</button>
                    <button onclick={ctx.link().callback(|_: MouseEvent| Undo)} disabled={!self.game.can_undo()}>
                        {English.t("action.undo")}
                    </button>
                    <button onclick={ctx.link().callback(|_: MouseEvent| AutoComplete)} disabled={!self.game.can_auto_complete()}>
                        {English.t("action.autoComplete")}
                    </button>
                    <aside>{English.t("label.moves")}{" "}{moves}</aside>
                </nav>
                <section class="top">
                    {self.view_pile(ctx, PileId::Stock)}
                    {self.view_pile(ctx, PileId::Waste)}
                    <span class="gap"/>
                    {for foundations}
                </section>
                <section class="tableau">{for tableau}</section>
                <p class="status">{English.t(self.game.status_key())}</p>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use retrodesk_core::solitaire::{Piles, Suit};

    fn view_with(piles: Piles) -> SolitaireView {
        SolitaireView {
            game: Solitaire::from_piles(piles),
            seed: None,
            selected: None,
        }
    }

    #[test]
    fn click_selects_then_second_click_moves() {
        let king = Card::new(Suit::Spades, 13).turned_up();
        let queen = Card::new(Suit::Hearts, 12).turned_up();
        let mut piles = Piles::default();
        piles.tableau[0].push(king);
        piles.tableau[1].push(queen);
        let mut view = view_with(piles);

        assert!(view.on_card(queen.id(), PileId::Tableau(1)));
        assert_eq!(
            view.selected,
            Some(Selected {
                card: queen.id(),
                source: PileId::Tableau(1)
            })
        );

        assert!(view.on_card(king.id(), PileId::Tableau(0)));
        assert_eq!(view.selected, None);
        assert_eq!(view.game.pile(PileId::Tableau(0)), &[king, queen]);
        assert!(view.game.pile(PileId::Tableau(1)).is_empty());
    }

    #[test]
    fn aces_go_straight_to_a_foundation() {
        let ace = Card::new(Suit::Clubs, 1).turned_up();
        let mut piles = Piles::default();
        piles.waste.push(ace);
        let mut view = view_with(piles);

        assert!(view.on_card(ace.id(), PileId::Waste));
        assert_eq!(view.selected, None);
        assert_eq!(view.game.piles().foundation_cards(), 1);
    }
}
