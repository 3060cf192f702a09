//! Scripted terminal sessions against the virtual output device

use riff_core::TrackRef;
use riff_player::{Command, Flow, PlayerSettings, Session, StatusSnapshot};
use riff_playback::test_utils::{StubDecoder, VirtualDevice};
use riff_playback::{ClipLoader, PlaybackStatus, Player};

const TRACK_FRAMES: u64 = 44_100 * 3;

fn session(settings: &PlayerSettings, tracks: usize) -> (Player, Session, VirtualDevice) {
    let device = VirtualDevice::new();
    let loader = ClipLoader::new(
        StubDecoder::new().with_default_frames(TRACK_FRAMES as usize),
        device.clone(),
    );
    let mut player = Player::new(loader, settings.player_config());
    player.set_playlist((0..tracks).map(|i| TrackRef::new(format!("/music/{}.mp3", i))));
    let mut session = Session::new();
    session.start(&mut player, false).unwrap();
    (player, session, device)
}

fn run_script(session: &mut Session, player: &mut Player, script: &[&str]) -> Flow {
    for line in script {
        let command: Command = line.parse().unwrap();
        if session.apply(command, player).unwrap() == Flow::Exit {
            return Flow::Exit;
        }
    }
    Flow::Continue
}

#[test]
fn navigate_playlist_from_the_keyboard() {
    let (mut player, mut session, _device) = session(&PlayerSettings::default(), 3);

    run_script(&mut session, &mut player, &["play", "next"]);
    assert_eq!(player.current_track(), Some(&TrackRef::new("/music/1.mp3")));
    assert_eq!(player.status(), PlaybackStatus::Playing);

    run_script(&mut session, &mut player, &["seek 1", "rewind"]);
    assert_eq!(player.clip_position(), 0);
    assert_eq!(player.current_track(), Some(&TrackRef::new("/music/1.mp3")));

    // Already at the start: the cursor is one past the loaded track, so
    // stepping back reloads it
    run_script(&mut session, &mut player, &["rewind"]);
    assert_eq!(player.current_track(), Some(&TrackRef::new("/music/1.mp3")));
    run_script(&mut session, &mut player, &["prev"]);
    assert_eq!(player.current_track(), Some(&TrackRef::new("/music/0.mp3")));

    assert_eq!(
        run_script(&mut session, &mut player, &["stop", "quit", "play"]),
        Flow::Exit
    );
    assert_eq!(player.status(), PlaybackStatus::Stopped);
}

#[test]
fn finished_track_stays_put_without_auto_advance() {
    let settings = PlayerSettings {
        auto_advance: false,
        ..PlayerSettings::default()
    };
    let (mut player, mut session, device) = session(&settings, 2);
    run_script(&mut session, &mut player, &["p"]);
    device.advance(TRACK_FRAMES);

    assert_eq!(session.tick(&mut player), Flow::Continue);
    assert_eq!(player.status(), PlaybackStatus::Finished);
    let snapshot = StatusSnapshot::from_player(&player);
    assert_eq!(snapshot.to_line(), "[finished] 0.mp3 0:03/0:03 [-15.0 dB]");

    // Play on a finished track starts it over
    run_script(&mut session, &mut player, &["p"]);
    assert_eq!(player.clip_position(), 0);
    assert_eq!(player.status(), PlaybackStatus::Playing);
}

#[test]
fn ticks_move_through_the_playlist() {
    let (mut player, mut session, device) = session(&PlayerSettings::default(), 2);
    run_script(&mut session, &mut player, &["play"]);

    device.advance(TRACK_FRAMES);
    session.tick(&mut player);
    assert_eq!(player.current_track(), Some(&TrackRef::new("/music/1.mp3")));

    let snapshot = StatusSnapshot::from_player(&player);
    assert_eq!(snapshot.playlist_index, Some(0));
    assert_eq!(snapshot.playlist_len, 2);
}

#[test]
fn every_new_clip_starts_at_the_default_volume() {
    let (mut player, mut session, device) = session(&PlayerSettings::default(), 3);
    assert_eq!(player.transport().gain(), Some(-15.0));

    run_script(&mut session, &mut player, &["vol 0", "play"]);
    assert_eq!(player.transport().gain(), Some(0.0));

    run_script(&mut session, &mut player, &["next"]);
    assert_eq!(player.transport().gain(), Some(-15.0));

    // Seeking keeps the clip and its volume
    run_script(&mut session, &mut player, &["vol 3", "seek 1"]);
    assert_eq!(player.transport().gain(), Some(3.0));

    // Rewind at frame 0 reloads
    run_script(&mut session, &mut player, &["rewind", "rewind"]);
    assert_eq!(player.transport().gain(), Some(-15.0));
    assert_eq!(player.status(), PlaybackStatus::Stopped);

    run_script(&mut session, &mut player, &["vol -5", "play"]);
    device.advance(TRACK_FRAMES);
    session.tick(&mut player);
    assert_eq!(player.status(), PlaybackStatus::Playing);
    assert_eq!(player.transport().gain(), Some(-15.0));
}

#[test]
fn volume_input_is_limited_to_the_slider() {
    let (mut player, mut session, _device) = session(&PlayerSettings::default(), 1);

    run_script(&mut session, &mut player, &["vol 50"]);
    assert_eq!(player.transport().gain(), Some(6.0));

    run_script(&mut session, &mut player, &["vol -60"]);
    assert_eq!(player.transport().gain(), Some(-80.0));
}

#[test]
fn single_track_ends_once_input_is_closed() {
    let (mut player, mut session, device) = session(&PlayerSettings::default(), 1);
    run_script(&mut session, &mut player, &["play"]);
    session.end_input();

    assert_eq!(session.tick(&mut player), Flow::Continue);
    device.advance(TRACK_FRAMES);
    assert_eq!(session.tick(&mut player), Flow::Exit);
    assert_eq!(player.status(), PlaybackStatus::Stopped);
}

#[test]
fn closed_input_plays_the_playlist_through_once() {
    let (mut player, mut session, device) = session(&PlayerSettings::default(), 2);
    run_script(&mut session, &mut player, &["play"]);
    session.end_input();

    device.advance(TRACK_FRAMES);
    assert_eq!(session.tick(&mut player), Flow::Continue);
    assert_eq!(player.current_track(), Some(&TrackRef::new("/music/1.mp3")));

    device.advance(TRACK_FRAMES);
    assert_eq!(session.tick(&mut player), Flow::Exit);
    assert_eq!(player.current_track(), Some(&TrackRef::new("/music/0.mp3")));
}

#[test]
fn interactive_session_keeps_wrapping() {
    let (mut player, mut session, device) = session(&PlayerSettings::default(), 1);
    run_script(&mut session, &mut player, &["play"]);

    for _ in 0..3 {
        device.advance(TRACK_FRAMES);
        assert_eq!(session.tick(&mut player), Flow::Continue);
        assert_eq!(player.status(), PlaybackStatus::Playing);
    }
}
