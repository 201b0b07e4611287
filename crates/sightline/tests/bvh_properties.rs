use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sightline::blocking::{Blocker, BlockingObject, TokenBlocker, TriangleBlocker, WallBlocker};
use sightline::math::{Point2, Point3, Real};
use sightline::partitioning::{Bvh2, Bvh3};
use sightline::query::{QueryOptions, Ray, Ray2, Ray3};

fn random_point2(rng: &mut StdRng) -> Point2 {
    Point2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0))
}

fn random_point3(rng: &mut StdRng) -> Point3 {
    let pt = random_point2(rng);
    Point3::new(pt.x, pt.y, rng.gen_range(0.0..20.0))
}

fn random_blocker(rng: &mut StdRng) -> Blocker {
    let center = random_point2(rng);
    let offset = Point2::new(rng.gen_range(-5.0..5.0), rng.gen_range(-5.0..5.0));

    match rng.gen_range(0..3) {
        0 => WallBlocker::new(center, center + offset.coords)
            .with_elevation(rng.gen_range(0.0..5.0), rng.gen_range(5.0..15.0))
            .into(),
        1 => TokenBlocker::new(
            center,
            rng.gen_range(0.5..3.0),
            rng.gen_range(0.5..3.0),
            rng.gen_range(0.0..5.0),
            rng.gen_range(5.0..10.0),
        )
        .into(),
        _ => {
            let z = rng.gen_range(0.0..20.0);
            TriangleBlocker::new(
                Point3::new(center.x, center.y, z),
                Point3::new(center.x + offset.x, center.y, z + 1.0),
                Point3::new(center.x, center.y + offset.y, z - 1.0),
            )
            .into()
        }
    }
}

fn brute_force<const D: usize>(objects: &[Blocker], ray: &Ray<D>, opts: &QueryOptions) -> bool
where
    Blocker: BlockingObject<D>,
{
    objects
        .iter()
        .any(|obj| BlockingObject::<D>::has_object_intersection(obj, ray, opts))
}

#[test]
fn traversals_agree_with_brute_force_in_3d() {
    let mut rng = StdRng::seed_from_u64(0);
    let opts = QueryOptions::default();

    for len in [1, 5, 32, 101, 300] {
        let objects: Vec<_> = (0..len).map(|_| random_blocker(&mut rng)).collect();
        let bvh = Bvh3::new(objects.clone());
        bvh.assert_well_formed();

        for _ in 0..300 {
            let ray = Ray3::from_points(random_point3(&mut rng), random_point3(&mut rng));
            let expected = brute_force(&objects, &ray, &opts);

            assert_eq!(bvh.has_intersection(&ray, &opts), expected);
            assert_eq!(bvh.has_intersection_non_recursive(&ray, &opts), expected);
            assert_eq!(bvh.closest_intersection(&ray, &opts).is_some(), expected);
        }
    }
}

#[test]
fn traversals_agree_with_brute_force_in_plan_view() {
    let mut rng = StdRng::seed_from_u64(1);
    let opts = QueryOptions::default();
    let objects: Vec<_> = (0..150).map(|_| random_blocker(&mut rng)).collect();
    let bvh = Bvh2::new(objects.clone());
    bvh.assert_well_formed();

    for _ in 0..500 {
        let ray = Ray2::from_points(random_point2(&mut rng), random_point2(&mut rng));
        let expected = brute_force(&objects, &ray, &opts);

        assert_eq!(bvh.has_intersection(&ray, &opts), expected);
        assert_eq!(bvh.has_intersection_non_recursive(&ray, &opts), expected);
    }
}

#[test]
fn refit_keeps_the_tree_well_formed_and_exact() {
    let mut rng = StdRng::seed_from_u64(2);
    let opts = QueryOptions::default();
    let mut bvh = Bvh3::new((0..64).map(|_| random_blocker(&mut rng)).collect());

    for _ in 0..10 {
        let moved: Vec<usize> = (0..5).map(|_| rng.gen_range(0..bvh.len())).collect();
        for i in &moved {
            *bvh.object_mut(*i).unwrap() = random_blocker(&mut rng);
        }
        bvh.update_objects(&moved).unwrap();
        bvh.assert_well_formed();

        for _ in 0..50 {
            let ray = Ray3::from_points(random_point3(&mut rng), random_point3(&mut rng));
            assert_eq!(
                bvh.has_intersection(&ray, &opts),
                brute_force(bvh.objects(), &ray, &opts)
            );
        }
    }
}

#[test]
fn closest_hit_is_the_nearest_exact_hit() {
    let mut rng = StdRng::seed_from_u64(3);
    let opts = QueryOptions::default();
    let bvh = Bvh3::new((0..200).map(|_| random_blocker(&mut rng)).collect());

    for _ in 0..300 {
        let ray = Ray3::from_points(random_point3(&mut rng), random_point3(&mut rng));
        let nearest: Option<Real> = bvh
            .objects()
            .iter()
            .filter_map(|obj| BlockingObject::<3>::object_intersection(obj, &ray, &opts))
            .min_by(|a, b| a.total_cmp(b));

        assert_eq!(bvh.closest_intersection(&ray, &opts).map(|hit| hit.1), nearest);
        assert_eq!(
            bvh.intersecting_objects(&ray, &opts).first().copied(),
            bvh.closest_intersection(&ray, &opts).map(|hit| hit.0)
        );
    }
}
