use crate::{
    config::AppConfig,
    db::DbPool,
    services::{
        budget::BudgetService, itinerary::ItineraryService, positions::PositionManager,
        share::ShareService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DbPool,
    pub itinerary: ItineraryService,
    pub budget: BudgetService,
    pub positions: PositionManager,
    pub share: ShareService,
}

impl AppState {
    pub fn new(config: AppConfig, db: DbPool) -> Self {
        Self {
            itinerary: ItineraryService::new(db.clone()),
            budget: BudgetService::new(db.clone()),
            positions: PositionManager::new(db.clone()),
            share: ShareService::new(db.clone()),
            config,
            db,
        }
    }
}
