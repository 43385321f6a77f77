use crate::actor_framework::{Entity, FrameworkError};
use crate::domain::{Review, ReviewCreate, ReviewPatch};
use super::actions::ReviewAction;

fn check_rating(rating: u8) -> Result<u8, FrameworkError> {
    if !(1..=5).contains(&rating) {
        return Err(FrameworkError::Validation("Rating must be between 1 and 5".into()));
    }
    Ok(rating)
}

impl Entity for Review {
    type Id = String;
    type CreateParams = ReviewCreate;
    type UpdateParams = ReviewPatch;
    type Action = ReviewAction;
    type ActionResult = Review;

    const COLLECTION: &'static str = "reviews";

    fn id(&self) -> &String {
        &self.id
    }

    fn from_create_params(id: String, params: ReviewCreate) -> Result<Self, FrameworkError> {
        let rating = check_rating(params.rating)?;
        Ok(Self {
            id,
            dish_id: params.dish_id,
            cooker_id: params.cooker_id,
            order_id: params.order_id,
            user_id: params.user_id,
            user_name: params.user_name,
            user_image: params.user_image,
            rating,
            comment: params.comment,
            created_at: params.created_at,
            updated_at: params.created_at,
            is_reported: false,
            reported_by: None,
            report_reason: None,
            reported_at: None,
            report_resolved: false,
            report_action: None,
            resolved_at: None,
            resolved_by: None,
        })
    }

    fn on_update(&mut self, patch: ReviewPatch) -> Result<(), FrameworkError> {
        if let Some(rating) = patch.rating {
            self.rating = check_rating(rating)?;
        }
        if let Some(comment) = patch.comment {
            self.comment = comment;
        }
        if let Some(at) = patch.updated_at {
            self.updated_at = at;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: ReviewAction) -> Result<Review, FrameworkError> {
        match action {
            ReviewAction::Report { reported_by, reason, at } => {
                self.is_reported = true;
                self.report_resolved = false;
                self.reported_by = Some(reported_by);
                self.report_reason = Some(reason);
                self.reported_at = Some(at);
            }
            ReviewAction::Resolve { action, resolved_by, at } => {
                self.is_reported = false;
                self.report_resolved = true;
                self.report_action = Some(action);
                self.resolved_by = Some(resolved_by);
                self.resolved_at = Some(at);
            }
        }
        Ok(self.clone())
    }
}
