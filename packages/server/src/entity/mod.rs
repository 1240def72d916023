pub mod blob_object;
pub mod blob_ref;
pub mod challenge;
pub mod challenge_configuration;
pub mod challenge_participant_team;
pub mod challenge_phase;
pub mod challenge_phase_split;
pub mod dataset_split;
pub mod host_team;
pub mod host_team_member;
pub mod leaderboard;
pub mod participant;
pub mod participant_team;
pub mod user;
