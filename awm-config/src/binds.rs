use std::ops::RangeInclusive;
use std::str::FromStr;

use bitflags::bitflags;
use knuffel::errors::DecodeError;
use miette::miette;
pub use xkeysym::Keysym;

/// Plain-tier binds: a compositor-modifier key combination mapped to an action.
#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct Binds(#[knuffel(children)] pub Vec<Bind>);

#[derive(Debug, Clone, PartialEq)]
pub struct Bind {
    pub key: Key,
    pub action: Action,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    pub keysym: Keysym,
    pub modifiers: Modifiers,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers : u8 {
        const CTRL = 1;
        const SHIFT = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
        const ISO_LEVEL3_SHIFT = 1 << 4;
        const ISO_LEVEL5_SHIFT = 1 << 5;
        /// The configured `mod-key`, written as `Mod` in binds.
        const COMPOSITOR = 1 << 6;
    }
}

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Spawn(#[knuffel(arguments)] Vec<String>),
    SpawnSh(#[knuffel(argument)] String),
    /// Shows the workspace with this 1-based number on the output under the pointer.
    FocusWorkspace(#[knuffel(argument)] u8),
    FocusWindowNext,
    FocusWindowPrevious,
    TileWorkspace,
    /// Sends the focused window to the workspace with this 1-based number.
    MoveWindowToWorkspace(#[knuffel(argument)] u8),
}

/// Shift-tier binds, matched on the physical keycode rather than the keysym.
///
/// The keysym of a digit key changes when Shift is held, the keycode does not.
#[derive(knuffel::Decode, Debug, Default, Clone, PartialEq)]
pub struct ShiftBinds(#[knuffel(children)] pub Vec<ShiftBind>);

#[derive(knuffel::Decode, Debug, Clone, PartialEq)]
pub enum ShiftBind {
    /// Keycodes `first..=last` send the focused window to workspaces `1..`.
    MoveWindowToWorkspace(
        #[knuffel(property(name = "first-keycode"))] u32,
        #[knuffel(property(name = "last-keycode"))] u32,
    ),
}

impl ShiftBind {
    pub fn keycodes(&self) -> RangeInclusive<u32> {
        match *self {
            ShiftBind::MoveWindowToWorkspace(first, last) => first..=last,
        }
    }

    /// Resolves the action for the keycode if it falls inside this bind's range.
    pub fn action(&self, keycode: u32) -> Option<Action> {
        let range = self.keycodes();
        if !range.contains(&keycode) {
            return None;
        }

        match self {
            ShiftBind::MoveWindowToWorkspace(..) => {
                let number = u8::try_from(keycode - range.start() + 1).ok()?;
                Some(Action::MoveWindowToWorkspace(number))
            }
        }
    }
}

impl<S> knuffel::Decode<S> for Bind
where
    S: knuffel::traits::ErrorSpan,
{
    fn decode_node(
        node: &knuffel::ast::SpannedNode<S>,
        ctx: &mut knuffel::decode::Context<S>,
    ) -> Result<Self, DecodeError<S>> {
        if let Some(type_name) = &node.type_name {
            ctx.emit_error(DecodeError::unexpected(
                type_name,
                "type name",
                "no type name expected for this node",
            ));
        }

        for val in node.arguments.iter() {
            ctx.emit_error(DecodeError::unexpected(
                &val.literal,
                "argument",
                "no arguments expected for this node",
            ));
        }

        for name in node.properties.keys() {
            ctx.emit_error(DecodeError::unexpected(
                name,
                "property",
                format!("unexpected property `{}`", name.escape_default()),
            ));
        }

        let key = node
            .node_name
            .parse::<Key>()
            .map_err(|e| DecodeError::conversion(&node.node_name, e.wrap_err("invalid keybind")))?;

        let mut children = node.children();

        // If the action is invalid but the key is fine, we still want to return something.
        // That way, the parent can handle the existence of duplicate keybinds,
        // even if their contents are not valid.
        let dummy = Self {
            key,
            action: Action::Spawn(vec![]),
        };

        if let Some(child) = children.next() {
            for unwanted_child in children {
                ctx.emit_error(DecodeError::unexpected(
                    unwanted_child,
                    "node",
                    "only one action is allowed per keybind",
                ));
            }

            match <Action as knuffel::Decode<S>>::decode_node(child, ctx) {
                Ok(action) => Ok(Self { key, action }),
                Err(e) => {
                    ctx.emit_error(e);
                    Ok(dummy)
                }
            }
        } else {
            ctx.emit_error(DecodeError::missing(
                node,
                "expected an action for this keybind",
            ));
            Ok(dummy)
        }
    }
}

impl FromStr for Key {
    type Err = miette::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut modifiers = Modifiers::empty();

        let mut split = s.split('+');
        let key = split.next_back().unwrap();

        for part in split {
            let part = part.trim();
            if part.eq_ignore_ascii_case("mod") {
                modifiers |= Modifiers::COMPOSITOR
            } else if part.eq_ignore_ascii_case("ctrl") || part.eq_ignore_ascii_case("control") {
                modifiers |= Modifiers::CTRL;
            } else if part.eq_ignore_ascii_case("shift") {
                modifiers |= Modifiers::SHIFT;
            } else if part.eq_ignore_ascii_case("alt") {
                modifiers |= Modifiers::ALT;
            } else if part.eq_ignore_ascii_case("super") || part.eq_ignore_ascii_case("win") {
                modifiers |= Modifiers::SUPER;
            } else if part.eq_ignore_ascii_case("iso_level3_shift")
                || part.eq_ignore_ascii_case("mod5")
            {
                modifiers |= Modifiers::ISO_LEVEL3_SHIFT;
            } else if part.eq_ignore_ascii_case("iso_level5_shift")
                || part.eq_ignore_ascii_case("mod3")
            {
                modifiers |= Modifiers::ISO_LEVEL5_SHIFT;
            } else {
                return Err(miette!("invalid modifier: {part}"));
            }
        }

        let keysym = keysym_from_name(key.trim()).ok_or_else(|| miette!("invalid key: {key}"))?;
        Ok(Key { keysym, modifiers })
    }
}

/// Resolves a key name the way binds spell it: named keys, `F1`–`F12`, or one printable
/// character.
///
/// Letters resolve to their lowercase keysym, since that's what the keyboard produces without
/// Shift held.
pub fn keysym_from_name(name: &str) -> Option<Keysym> {
    const NAMED: &[(&str, Keysym)] = &[
        ("Escape", Keysym::Escape),
        ("Return", Keysym::Return),
        ("Space", Keysym::space),
        ("Tab", Keysym::Tab),
        ("BackSpace", Keysym::BackSpace),
        ("Delete", Keysym::Delete),
        ("Left", Keysym::Left),
        ("Right", Keysym::Right),
        ("Up", Keysym::Up),
        ("Down", Keysym::Down),
        ("Home", Keysym::Home),
        ("End", Keysym::End),
        ("Print", Keysym::Print),
    ];

    if let Some((_, keysym)) = NAMED.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
        return Some(*keysym);
    }

    if let Some(n) = name
        .strip_prefix(['F', 'f'])
        .and_then(|n| n.parse::<u32>().ok())
        .filter(|n| (1..=12).contains(n))
    {
        return Some(Keysym::new(Keysym::F1.raw() + n - 1));
    }

    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_graphic() => {
            Some(Keysym::new(u32::from(c.to_ascii_lowercase())))
        }
        _ => None,
    }
}
