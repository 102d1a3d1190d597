//! Hoopshot - a 3D basketball shooting game built with Bevy
//!
//! Main entry point: app setup and system registration.

use std::path::Path;

use bevy::prelude::*;
use hoopshot::{
    Ball, BallBody, Collaborators, CourtGeometry, CurrentSettings, EventBus, GameEvent,
    GameplayPlugin, LogAudioSink, ModeCommand, ModeCommands, ModeRules, SqliteEventLogger,
    SqliteLeaderboard, constants::*, input, save_settings_system, settings, tuning, ui,
};
use hoopshot::court::{spawn_court, spawn_hoops};

fn main() {
    let court = match CourtGeometry::standard() {
        Ok(court) => court,
        Err(e) => {
            eprintln!("Invalid court geometry: {}", e);
            std::process::exit(1);
        }
    };

    // Load persistent settings (uses defaults if file doesn't exist)
    let current_settings = CurrentSettings::loaded();
    if let Err(e) = current_settings.settings.save() {
        warn!("Failed to save initial settings: {}", e);
    }

    let feedback_sink = ui::HudFeedbackSink::default();
    let mut collaborators = Collaborators::default()
        .with_audio(LogAudioSink)
        .with_feedback(feedback_sink.clone());
    match SqliteLeaderboard::open(Path::new(&current_settings.settings.leaderboard_db)) {
        Ok(leaderboard) => collaborators = collaborators.with_leaderboard(leaderboard),
        Err(e) => warn!("Leaderboard unavailable: {}", e),
    }

    let event_logger = if current_settings.settings.event_log_enabled {
        SqliteEventLogger::new(Path::new(&current_settings.settings.event_log_db), "game")
            .unwrap_or_else(|e| {
                warn!("Event log unavailable: {}", e);
                SqliteEventLogger::disabled()
            })
    } else {
        SqliteEventLogger::disabled()
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Hoopshot".into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(CLEAR_COLOR))
        .insert_resource(court)
        .insert_resource(ModeRules::default())
        .insert_resource(collaborators)
        .insert_resource(feedback_sink.toasts())
        .insert_resource(event_logger)
        .insert_resource(current_settings)
        .add_plugins(GameplayPlugin)
        .add_systems(Startup, (tuning::load_global_tuning_system, setup, ui::spawn_hud))
        .add_systems(PostStartup, (dress_ball, begin_session))
        .add_systems(Update, input::capture_input)
        .add_systems(
            Update,
            (
                ui::update_stats_text,
                ui::update_mode_status_text,
                ui::update_toast_text,
                ui::update_overlay_text,
                ui::draw_aim_indicator,
                ui::draw_ball_trail,
            ),
        )
        .add_systems(Update, (settings::remember_start_mode, save_settings_system).chain())
        .run();
}

/// Setup the camera, light and static court meshes
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    court: Res<CourtGeometry>,
) {
    // Camera - behind the center line, looking across the court
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 38.0, 62.0).looking_at(Vec3::new(0.0, RIM_HEIGHT * 0.5, 0.0), Vec3::Y),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(20.0, 50.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    spawn_court(&mut commands, &mut meshes, &mut materials, &court);
    spawn_hoops(&mut commands, &mut meshes, &mut materials, &court);
}

/// Give the simulated ball (spawned by the gameplay plugin) its mesh
fn dress_ball(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<(Entity, &BallBody), With<Ball>>,
) {
    for (entity, body) in &query {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(body.radius))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: BALL_COLOR,
                perceptual_roughness: 0.6,
                ..default()
            })),
        ));
    }
}

/// Log the session and start the remembered mode
fn begin_session(
    settings: Res<CurrentSettings>,
    logger: Res<SqliteEventLogger>,
    mut bus: ResMut<EventBus>,
    mut mode_commands: ResMut<ModeCommands>,
) {
    let session_id = if logger.is_enabled() {
        logger.session_id().to_string()
    } else {
        uuid::Uuid::new_v4().to_string()
    };
    bus.emit(GameEvent::SessionStart {
        session_id,
        timestamp: chrono::Utc::now().to_rfc3339(),
    });

    let kind = settings.settings.start_mode;
    info!("Starting in {}", kind);
    mode_commands.0 = Some(ModeCommand::Start(kind));
}
