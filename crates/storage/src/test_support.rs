//! Shared fixtures for the service tests.

use crate::memory::InMemoryStore;
use crate::models::{
    DoorPoints, Doors, Gender, NewCompetition, NewRun, NewUser, Participant, Role, RoleSet, Scale,
};
use crate::store::{CompetitionStore, ParticipantStore, ScaleStore, UserStore};

/// Id of the referee created first by every fixture.
pub const REFEREE_ID: i32 = 1;

/// One competition with a junior/A scale worth 10 points on door 1 and a
/// junior participant wearing dossard 7.
pub struct Fixture {
    pub store: InMemoryStore,
    pub competition_id: i32,
    pub admin_id: i32,
}

impl Fixture {
    pub async fn junior_zone_a() -> Self {
        let store = InMemoryStore::new();

        let referee = store
            .create_user(&NewUser {
                email: "referee@example.com".to_string(),
                first_name: "Rita".to_string(),
                last_name: "Referee".to_string(),
                roles: RoleSet::new(),
            })
            .await
            .unwrap();
        assert_eq!(referee.user_id, REFEREE_ID);

        let admin = store
            .create_user(&NewUser {
                email: "admin@example.com".to_string(),
                first_name: "Adam".to_string(),
                last_name: "Admin".to_string(),
                roles: [Role::CompetitionCreator].into_iter().collect(),
            })
            .await
            .unwrap();

        let competition = store
            .create_competition(&NewCompetition {
                name: "Spring Cross".to_string(),
                description: None,
                date: None,
                location: "Chamonix".to_string(),
                organizer: "CAF".to_string(),
                contact: "caf@example.com".to_string(),
            })
            .await
            .unwrap();

        let fixture = Self {
            store,
            competition_id: competition.competition_id,
            admin_id: admin.user_id,
        };
        fixture.add_scale("junior", "A", [10, 0, 0, 0, 0, 0]).await;
        fixture
            .store
            .create_participant(&Participant {
                competition_id: fixture.competition_id,
                dossard_number: 7,
                first_name: "Lea".to_string(),
                last_name: "Durand".to_string(),
                category: "junior".to_string(),
                gender: Gender::H,
                club: Some("ASM".to_string()),
            })
            .await
            .unwrap();
        fixture
    }

    pub async fn add_scale(&self, category: &str, zone: &str, points: [i32; 6]) {
        let [p1, p2, p3, p4, p5, p6] = points;
        self.store
            .create_scale(&Scale {
                competition_id: self.competition_id,
                category: category.to_string(),
                zone: zone.to_string(),
                points: DoorPoints {
                    points_door1: p1,
                    points_door2: p2,
                    points_door3: p3,
                    points_door4: p4,
                    points_door5: p5,
                    points_door6: p6,
                },
            })
            .await
            .unwrap();
    }

    pub async fn add_participant(&self, dossard: i32, category: &str, gender: Gender) -> Participant {
        self.store
            .create_participant(&Participant {
                competition_id: self.competition_id,
                dossard_number: dossard,
                first_name: format!("First{dossard}"),
                last_name: format!("Last{dossard}"),
                category: category.to_string(),
                gender,
                club: None,
            })
            .await
            .unwrap()
    }
}

/// A run recorded by [`REFEREE_ID`] with an auto-assigned number.
pub fn run_input(
    competition_id: i32,
    dossard: i32,
    zone: &str,
    doors: [bool; 6],
    penalty: i32,
    chrono_sec: i32,
) -> NewRun {
    NewRun {
        competition_id,
        dossard,
        run_number: 0,
        zone: zone.to_string(),
        doors: Doors::from_array(doors),
        penalty,
        chrono_sec,
        referee_id: REFEREE_ID,
    }
}
