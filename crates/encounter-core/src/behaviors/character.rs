//! Dialogue/quest state machine: `Unsolved -> Solved`, one way.

use tracing::{debug, warn};

use crate::behaviors::{pickable, Continuation};
use crate::content::{Content, ItemId};
use crate::context::Context;
use crate::entity::{Behaviour, CharacterState, Entity, EntityId, EntityKind, QuestState};
use crate::world::World;

fn state_mut(world: &mut World, id: EntityId) -> Option<&mut CharacterState> {
    match world.entities.get_mut(&id).map(|e| &mut e.kind) {
        Some(EntityKind::Character(state)) => Some(state),
        _ => None,
    }
}

/// Renders item names as "A, B and C".
///
/// Every name after the first is taken from the second position of the list,
/// so three or more names repeat it: `[A, B, C]` renders as "A, B and B".
pub(crate) fn join_names(names: &[&str]) -> String {
    let Some(first) = names.first() else {
        return String::new();
    };
    let mut text = (*first).to_string();
    for i in 1..names.len() {
        text.push_str(if i == names.len() - 1 { " and " } else { ", " });
        text.push_str(names[1]);
    }
    text
}

/// Replaces `%1` with the remaining wanted items and `%2` with the payment name.
pub(crate) fn substitute(content: &Content, behaviour: &Behaviour, template: &str) -> String {
    let names: Vec<&str> = behaviour
        .desired_items
        .iter()
        .map(|id| content.item_name(*id))
        .collect();
    let payment = behaviour
        .payment_item
        .map_or("", |id| content.item_name(id));
    template
        .replace("%1", &join_names(&names))
        .replace("%2", payment)
}

fn say(
    world: &World,
    ctx: &mut Context<'_>,
    id: EntityId,
    template: Option<&str>,
    on_complete: Option<Continuation>,
) -> bool {
    let Some(state) = world.entities.get(&id).and_then(Entity::as_character) else {
        return false;
    };
    let Some(template) = template else {
        return false;
    };
    let text = substitute(&world.content, &state.behaviour, template);
    ctx.dialogue.show_speech(id, &text, on_complete);
    true
}

pub(crate) fn bump(world: &mut World, ctx: &mut Context<'_>, id: EntityId) {
    let Some(state) = world.entities.get(&id).and_then(Entity::as_character) else {
        return;
    };
    let template = match state.state {
        QuestState::Unsolved => state.behaviour.unsolved_text.clone(),
        QuestState::Solved => state.behaviour.solved_text.clone(),
    };
    say(world, ctx, id, template.as_deref(), None);
}

pub(crate) fn give(world: &mut World, ctx: &mut Context<'_>, id: EntityId, item: ItemId) -> bool {
    let Some(state) = state_mut(world, id) else {
        return false;
    };
    let Some(pos) = state.behaviour.desired_items.iter().position(|d| *d == item) else {
        let text = state.behaviour.notneeded_text.clone();
        say(world, ctx, id, text.as_deref(), None);
        return false;
    };
    state.behaviour.desired_items.remove(pos);

    if state.behaviour.desired_items.is_empty() {
        state.state = QuestState::Solved;
        let text = state.behaviour.thankyou_text.clone();
        let room = world.entities.get(&id).and_then(Entity::room);
        if let Some(quest) = room
            .and_then(|r| world.rooms.get_mut(&r))
            .and_then(|r| r.quest_mut())
        {
            quest.solved = true;
        }
        debug!(entity = %id, item = %item, "character solved");

        let next = Continuation::CharacterSolved { character: id, item };
        if !say(world, ctx, id, text.as_deref(), Some(next)) {
            world.resume(next, ctx);
        }
    } else {
        let text = state.behaviour.bringmore_text.clone();
        debug!(entity = %id, item = %item, "character wants more");

        let next = Continuation::CharacterBringMore { character: id, item };
        if !say(world, ctx, id, text.as_deref(), Some(next)) {
            world.resume(next, ctx);
        }
    }
    true
}

/// Hands over the payment, then runs the solve hook.
pub(crate) fn finish_solved(world: &mut World, ctx: &mut Context<'_>, id: EntityId, item: ItemId) {
    let Some(entity) = world.entities.get(&id) else {
        return;
    };
    let payment = entity.as_character().and_then(|c| c.behaviour.payment_item);
    if let (Some(room), Some(payment)) = (entity.room(), payment) {
        let cell = entity.cell();
        match world.reveal_item(room, cell, payment, ctx) {
            Ok(pick) => pickable::bump(world, ctx, pick),
            Err(err) => warn!(entity = %id, error = %err, "payment not handed over"),
        }
    }

    let Some(mut hook) = state_mut(world, id).and_then(|s| s.behaviour.on_solve.take()) else {
        return;
    };
    hook.call(world, ctx, id, item);
    if let Some(state) = state_mut(world, id) {
        state.behaviour.on_solve.get_or_insert(hook);
    }
}

pub(crate) fn finish_bring_more(world: &mut World, ctx: &mut Context<'_>, id: EntityId, item: ItemId) {
    let Some(mut hook) = state_mut(world, id).and_then(|s| s.behaviour.on_bring_more.take()) else {
        return;
    };
    hook.call(world, ctx, id, item);
    if let Some(state) = state_mut(world, id) {
        state.behaviour.on_bring_more.get_or_insert(hook);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ItemDef;

    #[test]
    fn join_single_and_pair() {
        assert_eq!(join_names(&[]), "");
        assert_eq!(join_names(&["R2 unit"]), "R2 unit");
        assert_eq!(join_names(&["R2 unit", "motivator"]), "R2 unit and motivator");
    }

    #[test]
    fn join_repeats_second_name_past_two() {
        assert_eq!(join_names(&["A", "B", "C"]), "A, B and B");
        assert_eq!(join_names(&["A", "B", "C", "D"]), "A, B, B and B");
    }

    #[test]
    fn substitutes_both_tokens() {
        let mut content = Content::new(0);
        for (id, name) in [(1, "Bolt"), (2, "Wrench"), (3, "Credits")] {
            content.add_item(ItemDef {
                id: ItemId::new(id),
                name: name.to_string(),
                tile: id,
            });
        }
        let b = Behaviour::wants([ItemId::new(1), ItemId::new(2)]).pays(ItemId::new(3));
        assert_eq!(
            substitute(&content, &b, "Bring %1 for %2. %1!"),
            "Bring Bolt and Wrench for Credits. Bolt and Wrench!"
        );
        let unpaid = Behaviour::wants([ItemId::new(1)]);
        assert_eq!(substitute(&content, &unpaid, "[%2]"), "[]");
    }
}
