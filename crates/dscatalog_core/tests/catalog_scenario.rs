//! The same catalog scenario against every storage adapter.

use dscatalog_core::db::{open_db_in_memory, seed_demo_catalog};
use dscatalog_core::{
    Category, CategoryDto, CategoryRepository, CategoryService, InMemoryCatalog, PageRequest,
    Product, ProductDto, ProductFilter, ProductId, ProductRepository, ProductService,
    ServiceError, Sort, SortProperty, SqliteCategoryRepository, SqliteProductRepository,
};

const SEEDED_PRODUCTS: i64 = 25;

fn new_product_dto() -> ProductDto {
    ProductDto {
        id: None,
        name: "Phone".to_string(),
        description: "Good Phone".to_string(),
        price: 800.0,
        img_url: "https://img.com/img.png".to_string(),
        date: 1_603_101_600_000,
        category_ids: vec![2],
    }
}

fn run_catalog_scenario<P, C, CR>(
    products: &ProductService<P, C>,
    categories: &CategoryService<CR>,
    add_order_line: impl Fn(ProductId),
) where
    P: ProductRepository,
    C: CategoryRepository,
    CR: CategoryRepository,
{
    for id in 1..=SEEDED_PRODUCTS {
        assert_eq!(products.find_by_id(id).unwrap().id, Some(id));
    }
    assert!(products.find_by_id(63).unwrap_err().is_not_found());

    let created = products.insert(&new_product_dto()).unwrap();
    assert_eq!(created.id, Some(SEEDED_PRODUCTS + 1));
    assert_eq!(created.category_ids, vec![2]);

    products.delete(1).unwrap();
    assert!(products.find_by_id(1).unwrap_err().is_not_found());

    let missing = products.delete(63).unwrap_err();
    assert!(matches!(
        missing,
        ServiceError::ResourceNotFound {
            entity: "product",
            id: 63
        }
    ));

    add_order_line(4);
    assert!(products.delete(4).unwrap_err().is_database());
    assert_eq!(products.find_by_id(4).unwrap().id, Some(4));

    let page = products.find_all_paged(&PageRequest::of(0, 10)).unwrap();
    assert!(page.content.len() <= 10);
    assert_eq!(page.total_elements, SEEDED_PRODUCTS as u64);
    assert_eq!(page.total_pages, 3);

    let updated = products
        .update(
            4,
            &ProductDto {
                name: "PC Gamer Deluxe".to_string(),
                category_ids: vec![1, 3],
                ..new_product_dto()
            },
        )
        .unwrap();
    assert_eq!(updated.id, Some(4));
    assert_eq!(updated.category_ids, vec![1, 3]);
    assert!(products
        .update(63, &new_product_dto())
        .unwrap_err()
        .is_not_found());

    let by_name = products
        .find_all_paged(&PageRequest::sorted(0, 3, Sort::asc(SortProperty::Name)))
        .unwrap();
    assert_eq!(by_name.content[0].name, "Macbook Pro");

    assert!(categories.delete(3).unwrap_err().is_database());
    let extra = categories.insert(&CategoryDto::new("Garden")).unwrap();
    let renamed = categories
        .update(extra.id.unwrap(), &CategoryDto::new("Garden & Outdoor"))
        .unwrap();
    assert_eq!(renamed.name, "Garden & Outdoor");
    categories.delete(extra.id.unwrap()).unwrap();
    assert!(categories
        .find_by_id(extra.id.unwrap())
        .unwrap_err()
        .is_not_found());
}

fn assert_name_filter_folds_ascii_only<P, C>(products: &ProductService<P, C>)
where
    P: ProductRepository,
    C: CategoryRepository,
{
    products
        .insert(&ProductDto {
            name: "Éclair Maker".to_string(),
            ..new_product_dto()
        })
        .unwrap();
    let matching = |needle: &str| {
        let filter = ProductFilter {
            name: Some(needle.to_string()),
            category_id: None,
        };
        let page = products
            .search_paged(&filter, &PageRequest::default())
            .unwrap();
        page.content
            .into_iter()
            .map(|product| product.name)
            .collect::<Vec<_>>()
    };

    assert_eq!(matching("MAKER"), vec!["Éclair Maker"]);
    assert_eq!(matching("ÉCLAIR"), vec!["Éclair Maker"]);
    assert!(matching("éclair").is_empty());
}

#[test]
fn sqlite_name_filter_folds_ascii_only() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_catalog(&mut conn).unwrap();
    let products = ProductService::new(
        SqliteProductRepository::try_new(&conn).unwrap(),
        SqliteCategoryRepository::try_new(&conn).unwrap(),
    );

    assert_name_filter_folds_ascii_only(&products);
}

#[test]
fn in_memory_name_filter_folds_ascii_only() {
    let catalog = InMemoryCatalog::new();
    seed_in_memory(&catalog);
    let products = ProductService::new(catalog.products(), catalog.categories());

    assert_name_filter_folds_ascii_only(&products);
}

#[test]
fn sqlite_catalog_scenario() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_catalog(&mut conn).unwrap();

    let products = ProductService::new(
        SqliteProductRepository::try_new(&conn).unwrap(),
        SqliteCategoryRepository::try_new(&conn).unwrap(),
    );
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap());

    run_catalog_scenario(&products, &categories, |product_id| {
        conn.execute(
            "INSERT INTO order_items (product_id, quantity) VALUES (?1, 1);",
            [product_id],
        )
        .unwrap();
    });
}

#[test]
fn in_memory_catalog_scenario() {
    let catalog = InMemoryCatalog::new();
    seed_in_memory(&catalog);

    let products = ProductService::new(catalog.products(), catalog.categories());
    let categories = CategoryService::new(catalog.categories());

    run_catalog_scenario(&products, &categories, |product_id| {
        catalog.add_order_line(product_id, 1).unwrap();
    });
}

fn seed_in_memory(catalog: &InMemoryCatalog) {
    let category_repo = catalog.categories();
    let books = category_repo.save(&Category::new("Books")).unwrap();
    let electronics = category_repo.save(&Category::new("Electronics")).unwrap();
    let computers = category_repo.save(&Category::new("Computers")).unwrap();

    let product_repo = catalog.products();
    let names = [
        "The Lord of the Rings",
        "Smart TV",
        "Macbook Pro",
    ];
    for index in 0..SEEDED_PRODUCTS {
        let name = names
            .get(index as usize)
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("PC Gamer {index}"));
        let mut product = Product::new(name, "", 100.0 + index as f64, "", index);
        match index {
            0 => product.add_category(books.clone()),
            1 => product.add_category(electronics.clone()),
            2 => {
                product.add_category(electronics.clone());
                product.add_category(computers.clone());
            }
            _ => product.add_category(computers.clone()),
        }
        let saved = product_repo.save(&product).unwrap();
        assert_eq!(saved.id, Some(index + 1));
    }
}
