//! User account entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::UserProfile;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub weight: Option<f64>,
    pub height: Option<i32>,
    pub photo_url: Option<String>,
    pub date_of_birth: Option<Date>,
    pub gender: Option<String>,
    pub fitness_goal: Option<String>,
    pub experience_level: Option<String>,
    pub weekly_workouts: Option<i32>,
    pub workout_duration: Option<i32>,
    pub preferred_workout_times: Option<String>,
    pub enabled: bool,
    pub locked: bool,
    pub failed_login_attempts: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_role::Entity")]
    UserRoles,
}

impl Related<super::user_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserRoles.def()
    }
}

impl Related<super::role::Entity> for Entity {
    fn to() -> RelationDef {
        super::user_role::Relation::Role.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::user_role::Relation::User.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            display_name: self.display_name.clone(),
            phone: self.phone.clone(),
            weight: self.weight,
            height: self.height,
            photo_url: self.photo_url.clone(),
            date_of_birth: self.date_of_birth,
            gender: self.gender.clone(),
            fitness_goal: self.fitness_goal.clone(),
            experience_level: self.experience_level.clone(),
            weekly_workouts: self.weekly_workouts,
            workout_duration: self.workout_duration,
            preferred_workout_times: self.preferred_workout_times.clone(),
        }
    }
}

impl ActiveModel {
    /// Overwrite every profile column.
    pub fn set_profile(&mut self, profile: UserProfile) {
        self.display_name = Set(profile.display_name);
        self.phone = Set(profile.phone);
        self.weight = Set(profile.weight);
        self.height = Set(profile.height);
        self.photo_url = Set(profile.photo_url);
        self.date_of_birth = Set(profile.date_of_birth);
        self.gender = Set(profile.gender);
        self.fitness_goal = Set(profile.fitness_goal);
        self.experience_level = Set(profile.experience_level);
        self.weekly_workouts = Set(profile.weekly_workouts);
        self.workout_duration = Set(profile.workout_duration);
        self.preferred_workout_times = Set(profile.preferred_workout_times);
    }
}
