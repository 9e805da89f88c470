use dscatalog_core::{
    Category, CategoryId, CategoryRepository, InMemoryCatalog, Page, PageRequest, Product,
    ProductDto, ProductFilter, ProductId, ProductRepository, ProductService, RepoError, RepoResult,
    ServiceError,
};
use std::cell::Cell;
use std::rc::Rc;

const EXISTING_ID: ProductId = 1;
const NON_EXISTING_ID: ProductId = 1000;
const DEPENDENT_ID: ProductId = 4;

#[derive(Default)]
struct Calls {
    find_by_id: Cell<usize>,
    save: Cell<usize>,
    delete_by_id: Cell<usize>,
    find_all: Cell<usize>,
    category_find_by_id: Cell<usize>,
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

fn stored_product() -> Product {
    let mut product = Product::new(
        "Phone",
        "Good Phone",
        800.0,
        "https://img.com/img.png",
        1_603_101_600_000,
    );
    product.id = Some(EXISTING_ID);
    product.add_category(Category::with_id(2, "Electronics"));
    product
}

fn product_dto() -> ProductDto {
    ProductDto {
        id: None,
        name: "Phone v2".to_string(),
        description: "Better phone".to_string(),
        price: 900.0,
        img_url: "https://img.com/img2.png".to_string(),
        date: 1_603_101_600_000,
        category_ids: vec![1],
    }
}

struct StubProducts {
    calls: Rc<Calls>,
}

impl ProductRepository for StubProducts {
    fn find_by_id(&self, id: ProductId) -> RepoResult<Option<Product>> {
        bump(&self.calls.find_by_id);
        Ok((id == EXISTING_ID).then(stored_product))
    }

    fn exists_by_id(&self, id: ProductId) -> RepoResult<bool> {
        Ok(id == EXISTING_ID)
    }

    fn save(&self, product: &Product) -> RepoResult<Product> {
        bump(&self.calls.save);
        let mut saved = product.clone();
        saved.id.get_or_insert(26);
        Ok(saved)
    }

    fn delete_by_id(&self, id: ProductId) -> RepoResult<()> {
        bump(&self.calls.delete_by_id);
        match id {
            EXISTING_ID => Ok(()),
            DEPENDENT_ID => Err(RepoError::IntegrityViolation {
                entity: "product",
                id,
            }),
            _ => Err(RepoError::NotFound {
                entity: "product",
                id,
            }),
        }
    }

    fn find_all(&self, _filter: &ProductFilter, page: &PageRequest) -> RepoResult<Page<Product>> {
        bump(&self.calls.find_all);
        Ok(Page::new(vec![stored_product()], page, 1))
    }
}

struct StubCategories {
    calls: Rc<Calls>,
}

impl CategoryRepository for StubCategories {
    fn find_by_id(&self, id: CategoryId) -> RepoResult<Option<Category>> {
        bump(&self.calls.category_find_by_id);
        Ok((id == 1).then(|| Category::with_id(1, "Electronics")))
    }

    fn exists_by_id(&self, id: CategoryId) -> RepoResult<bool> {
        Ok(id == 1)
    }

    fn save(&self, category: &Category) -> RepoResult<Category> {
        Ok(category.clone())
    }

    fn delete_by_id(&self, _id: CategoryId) -> RepoResult<()> {
        Ok(())
    }

    fn find_all(&self, page: &PageRequest) -> RepoResult<Page<Category>> {
        Ok(Page::new(Vec::new(), page, 0))
    }
}

fn service() -> (ProductService<StubProducts, StubCategories>, Rc<Calls>) {
    let calls = Rc::new(Calls::default());
    let service = ProductService::new(
        StubProducts {
            calls: Rc::clone(&calls),
        },
        StubCategories {
            calls: Rc::clone(&calls),
        },
    );
    (service, calls)
}

#[test]
fn delete_does_nothing_when_id_exists() {
    let (service, calls) = service();

    service.delete(EXISTING_ID).unwrap();

    assert_eq!(calls.delete_by_id.get(), 1);
}

#[test]
fn delete_returns_resource_not_found_when_id_does_not_exist() {
    let (service, calls) = service();

    let err = service.delete(NON_EXISTING_ID).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::ResourceNotFound {
            entity: "product",
            id: NON_EXISTING_ID
        }
    ));
    assert_eq!(calls.delete_by_id.get(), 1);
}

#[test]
fn delete_returns_database_error_when_id_is_referenced() {
    let (service, calls) = service();

    let err = service.delete(DEPENDENT_ID).unwrap_err();

    assert!(err.is_database());
    assert_eq!(calls.delete_by_id.get(), 1);
}

#[test]
fn find_all_paged_returns_page() {
    let (service, calls) = service();

    let page = service.find_all_paged(&PageRequest::of(0, 10)).unwrap();

    assert_eq!(page.content.len(), 1);
    assert_eq!(page.size, 10);
    assert_eq!(page.content[0].category_ids, vec![2]);
    assert_eq!(calls.find_all.get(), 1);
}

#[test]
fn find_by_id_returns_dto_when_id_exists() {
    let (service, calls) = service();

    let dto = service.find_by_id(EXISTING_ID).unwrap();

    assert_eq!(dto.id, Some(EXISTING_ID));
    assert_eq!(calls.find_by_id.get(), 1);
}

#[test]
fn find_by_id_returns_resource_not_found_when_id_does_not_exist() {
    let (service, calls) = service();

    let err = service.find_by_id(NON_EXISTING_ID).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(calls.find_by_id.get(), 1);
}

#[test]
fn update_returns_dto_when_id_exists() {
    let (service, calls) = service();

    let dto = service.update(EXISTING_ID, &product_dto()).unwrap();

    assert_eq!(dto.id, Some(EXISTING_ID));
    assert_eq!(dto.name, "Phone v2");
    assert_eq!(dto.category_ids, vec![1]);
    assert_eq!(calls.find_by_id.get(), 1);
    assert_eq!(calls.category_find_by_id.get(), 1);
    assert_eq!(calls.save.get(), 1);
}

#[test]
fn update_returns_resource_not_found_before_any_write_when_id_does_not_exist() {
    let (service, calls) = service();

    let err = service.update(NON_EXISTING_ID, &product_dto()).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(calls.find_by_id.get(), 1);
    assert_eq!(calls.category_find_by_id.get(), 0);
    assert_eq!(calls.save.get(), 0);
}

#[test]
fn update_returns_resource_not_found_for_unknown_category() {
    let (service, calls) = service();
    let mut dto = product_dto();
    dto.category_ids = vec![1, 77];

    let err = service.update(EXISTING_ID, &dto).unwrap_err();

    assert!(matches!(
        err,
        ServiceError::ResourceNotFound {
            entity: "category",
            id: 77
        }
    ));
    assert_eq!(calls.save.get(), 0);
}

#[test]
fn insert_ignores_dto_id_and_returns_assigned_id() {
    let (service, calls) = service();
    let mut dto = product_dto();
    dto.id = Some(EXISTING_ID);

    let created = service.insert(&dto).unwrap();

    assert_eq!(created.id, Some(26));
    assert_eq!(calls.save.get(), 1);
}

#[test]
fn insert_rejects_invalid_fields_before_storage() {
    let catalog = InMemoryCatalog::new();
    let service = ProductService::new(catalog.products(), catalog.categories());
    let mut dto = product_dto();
    dto.category_ids.clear();
    dto.price = -5.0;

    let err = service.insert(&dto).unwrap_err();

    assert!(matches!(err, ServiceError::Validation(_)));
    let page = service.find_all_paged(&PageRequest::default()).unwrap();
    assert_eq!(page.total_elements, 0);
}
