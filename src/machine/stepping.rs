use super::key::{Key, Mechanism};
use crate::core_types::{shift, Letter, Message};

#[inline(always)]
fn advance(key: &mut Key, slot: usize) {
    let s = &mut key.slots[slot];
    s.position = shift(s.position, 1);
}

#[inline(always)]
fn on_turnover(key: &Key, slot: usize) -> bool {
    let s = &key.slots[slot];
    s.wheel.is_turnover(s.position)
}

/// Advances the rotating wheels by one letter, in place.
pub fn step(key: &mut Key) {
    let Some(fast) = key.fast_slot() else {
        return;
    };
    match key.mechanism {
        Mechanism::Stepping => {
            let middle = fast
                .checked_sub(1)
                .filter(|&m| key.slots[m].rotating);
            let left = middle
                .and_then(|m| m.checked_sub(1))
                .filter(|&l| key.slots[l].rotating);

            if let Some(m) = middle {
                if on_turnover(key, m) {
                    // Double step: the middle pawl drags the middle wheel too.
                    advance(key, m);
                    if let Some(l) = left {
                        advance(key, l);
                    }
                } else if on_turnover(key, fast) {
                    advance(key, m);
                }
            }
            advance(key, fast);
        }
        Mechanism::Odometer => {
            let mut slot = fast;
            loop {
                let carry = on_turnover(key, slot);
                advance(key, slot);
                if !carry || slot == 0 || !key.slots[slot - 1].rotating {
                    break;
                }
                slot -= 1;
            }
        }
    }
}

/// Sends `x` through the wheels and back, without the plugboard and without stepping.
#[inline]
pub fn scramble_letter(x: Letter, key: &Key) -> Letter {
    let mut y = x;
    for slot in key.slots.iter().rev() {
        let off = slot.offset();
        y = shift(slot.wheel.wiring.forward(shift(y, off)), -off);
    }
    for slot in key.slots.iter().skip(1) {
        let off = slot.offset();
        y = shift(slot.wheel.wiring.inverse(shift(y, off)), -off);
    }
    y
}

/// Steps before every letter, as the machine does on key press.
/// Positions are restored before returning.
pub fn encrypt(key: &mut Key, message: &Message) -> Message {
    let saved = key.positions();
    let mut out = Vec::with_capacity(message.len());
    for &c in message.iter() {
        step(key);
        let p = &key.plugboard;
        out.push(p.get(scramble_letter(p.get(c), key)));
    }
    key.set_positions(&saved);
    Message::from_trusted(out)
}
