use criterion::{Criterion, criterion_group, criterion_main};
use domain::{Cart, CartStore, Money, PricingEngine, Product};

fn catalog(size: u32) -> Vec<Product> {
    (1..=size)
        .map(|n| {
            Product::new(
                i64::from(n),
                format!("Product {n}"),
                Money::from_cents(100 * i64::from(n)),
                20,
            )
        })
        .collect()
}

fn bench_add_item(c: &mut Criterion) {
    let products = catalog(50);

    c.bench_function("cart/add_50_items", |b| {
        b.iter(|| {
            let mut cart = Cart::new();
            for product in &products {
                cart.add_item(product, 2).unwrap();
            }
            cart
        });
    });
}

fn bench_merge_into_existing_line(c: &mut Criterion) {
    let product = Product::new(1, "Chain", Money::from_cents(2500), 1000);

    c.bench_function("cart/merge_100_adds_one_line", |b| {
        b.iter(|| {
            let mut cart = Cart::new();
            for _ in 0..100 {
                cart.add_item(&product, 1).unwrap();
            }
            cart
        });
    });
}

fn bench_subtotal(c: &mut Criterion) {
    let products = catalog(100);
    let mut cart = Cart::new();
    for product in &products {
        cart.add_item(product, 3).unwrap();
    }

    c.bench_function("cart/subtotal_100_lines", |b| {
        b.iter(|| cart.subtotal());
    });
}

fn bench_totals(c: &mut Criterion) {
    let engine = PricingEngine::default();
    let subtotal = Money::from_cents(31750);

    c.bench_function("pricing/totals", |b| {
        b.iter(|| engine.totals(subtotal));
    });
}

fn bench_store_mutation_cycle(c: &mut Criterion) {
    let products = catalog(10);

    c.bench_function("store/add_update_remove_cycle", |b| {
        b.iter(|| {
            let store = CartStore::default();
            for product in &products {
                store.add_item(product, 1).unwrap();
            }
            for product in &products {
                store.update_quantity(product.id, 5).unwrap();
            }
            for product in &products {
                store.remove_item(product.id).unwrap();
            }
            store
        });
    });
}

criterion_group!(
    benches,
    bench_add_item,
    bench_merge_into_existing_line,
    bench_subtotal,
    bench_totals,
    bench_store_mutation_cycle,
);
criterion_main!(benches);
