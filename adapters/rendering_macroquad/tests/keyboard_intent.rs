use bombing_adventure_core::{MoveX, MoveY, MovementIntent};
use bombing_adventure_rendering_macroquad::HeldDirections;

fn intent(left: bool, right: bool, up: bool, down: bool) -> MovementIntent {
    HeldDirections {
        left,
        right,
        up,
        down,
    }
    .intent()
}

#[test]
fn single_keys_map_to_their_axis() {
    assert_eq!(
        intent(true, false, false, false),
        MovementIntent::new(MoveX::Left, MoveY::Stop)
    );
    assert_eq!(
        intent(false, false, false, true),
        MovementIntent::new(MoveX::Stop, MoveY::Down)
    );
}

#[test]
fn diagonal_keys_combine_both_axes() {
    assert_eq!(
        intent(false, true, true, false),
        MovementIntent::new(MoveX::Right, MoveY::Up)
    );
}

#[test]
fn opposing_keys_cancel_out() {
    assert!(intent(true, true, false, false).is_idle());
    assert_eq!(
        intent(true, true, true, true),
        MovementIntent::default()
    );
}

#[test]
fn released_keys_stop_the_player() {
    assert!(HeldDirections::default().intent().is_idle());
}
