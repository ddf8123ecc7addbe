//! Ownership guard: a caller may only touch the medical history of the pets
//! where they are the registered responsible party.

use crate::{errors::MedicalError, metric, models, repo};
use uuid::Uuid;

/// Looks the pet up in the pet directory and checks `caller_id` is its
/// responsible party.
///
/// The pet directory and the medical store share no transaction, a pet removed
/// after a previous check is simply reported as [`MedicalError::PetNotFound`].
///
/// # Errors
/// - [`MedicalError::PetNotFound`] when the directory has no such pet
/// - [`MedicalError::NotOwner`] when the pet belongs to someone else
/// - [`MedicalError::StoreUnavailable`] when the directory can't be queried
pub async fn ensure_pet_owner(
    caller_id: Uuid,
    pet_id: Uuid,
    pet_directory: &repo::ImplPetDirectory,
) -> Result<models::pet::Pet, MedicalError> {
    let Some(pet) = pet_directory.get_pet_by_id(pet_id).await? else {
        logfire::warn!(
            "Pet {pet_id} not found for caller {caller_id}",
            pet_id = pet_id.to_string(),
            caller_id = caller_id.to_string()
        );
        metric::incr_rejection_statds(MedicalError::PetNotFound.reason());
        return Err(MedicalError::PetNotFound);
    };

    if !pet.is_responsible(caller_id) {
        logfire::warn!(
            "Caller {caller_id} is not responsible of pet {pet_id}",
            pet_id = pet_id.to_string(),
            caller_id = caller_id.to_string()
        );
        metric::incr_rejection_statds(MedicalError::NotOwner.reason());
        return Err(MedicalError::NotOwner);
    }

    Ok(pet)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::MockPetDirectory;
    use mockall::predicate::*;

    fn pet_directory_with(pet: Option<models::pet::Pet>) -> repo::ImplPetDirectory {
        let mut mock_directory = MockPetDirectory::new();
        let expected_id = pet.as_ref().map(|p| p.id);
        mock_directory
            .expect_get_pet_by_id()
            .times(1)
            .returning(move |id| {
                assert!(expected_id.is_none_or(|expected| expected == id));
                Ok(pet.clone())
            });
        Box::new(mock_directory)
    }

    #[ntex::test]
    async fn test_ensure_pet_owner_success() {
        let caller_id = Uuid::new_v4();
        let pet = models::pet::Pet {
            id: Uuid::new_v4(),
            responsible_id: caller_id,
        };
        let directory = pet_directory_with(Some(pet.clone()));

        let result = ensure_pet_owner(caller_id, pet.id, &directory).await;

        assert_eq!(result, Ok(pet));
    }

    #[ntex::test]
    async fn test_ensure_pet_owner_pet_not_found() {
        let directory = pet_directory_with(None);

        let result = ensure_pet_owner(Uuid::new_v4(), Uuid::new_v4(), &directory).await;

        assert_eq!(result, Err(MedicalError::PetNotFound));
    }

    #[ntex::test]
    async fn test_ensure_pet_owner_other_responsible() {
        let pet = models::pet::Pet {
            id: Uuid::new_v4(),
            responsible_id: Uuid::new_v4(),
        };
        let directory = pet_directory_with(Some(pet.clone()));

        let result = ensure_pet_owner(Uuid::new_v4(), pet.id, &directory).await;

        assert_eq!(result, Err(MedicalError::NotOwner));
    }

    #[ntex::test]
    async fn test_ensure_pet_owner_directory_down() {
        let pet_id = Uuid::new_v4();
        let mut mock_directory = MockPetDirectory::new();
        mock_directory
            .expect_get_pet_by_id()
            .with(eq(pet_id))
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("unable to open database file")));
        let directory: repo::ImplPetDirectory = Box::new(mock_directory);

        let result = ensure_pet_owner(Uuid::new_v4(), pet_id, &directory).await;

        assert!(matches!(result, Err(MedicalError::StoreUnavailable(_))));
    }
}
