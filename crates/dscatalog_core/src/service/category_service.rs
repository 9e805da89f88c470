//! Category use-case service.

use crate::dto::CategoryDto;
use crate::model::category::{Category, CategoryId};
use crate::page::{Page, PageRequest};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::CATEGORY_ENTITY;
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Category service facade over repository implementations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn find_all_paged(&self, page: &PageRequest) -> ServiceResult<Page<CategoryDto>> {
        Ok(self.repo.find_all(page)?.map(CategoryDto::from))
    }

    pub fn find_by_id(&self, id: CategoryId) -> ServiceResult<CategoryDto> {
        self.repo
            .find_by_id(id)?
            .map(CategoryDto::from)
            .ok_or(ServiceError::ResourceNotFound {
                entity: CATEGORY_ENTITY,
                id,
            })
    }

    pub fn insert(&self, dto: &CategoryDto) -> ServiceResult<CategoryDto> {
        let saved = self.repo.save(&Category::new(dto.name.clone()))?;
        info!(
            "event=category_insert module=service status=ok id={}",
            saved.id.unwrap_or_default()
        );
        Ok(CategoryDto::from(saved))
    }

    /// Renames an existing category.
    pub fn update(&self, id: CategoryId, dto: &CategoryDto) -> ServiceResult<CategoryDto> {
        let mut category = self
            .repo
            .find_by_id(id)?
            .ok_or(ServiceError::ResourceNotFound {
                entity: CATEGORY_ENTITY,
                id,
            })?;
        dto.copy_onto(&mut category);
        let saved = self.repo.save(&category)?;
        info!("event=category_update module=service status=ok id={id}");
        Ok(CategoryDto::from(saved))
    }

    /// Deletes a category; fails with `Database` while products use it.
    pub fn delete(&self, id: CategoryId) -> ServiceResult<()> {
        self.repo.delete_by_id(id).map_err(|err| {
            let err = ServiceError::from(err);
            warn!("event=category_delete module=service status=error id={id} error={err}");
            err
        })?;
        info!("event=category_delete module=service status=ok id={id}");
        Ok(())
    }
}
