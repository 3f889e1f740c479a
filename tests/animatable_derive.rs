use zoom_gallery::animation::Animatable;
use zoom_gallery::geometry::Vector2;

#[derive(Clone, Debug, PartialEq, Animatable)]
struct Camera {
    zoom: f32,
    center: Vector2,
}

#[derive(Clone, Debug, PartialEq, Animatable)]
struct Opacity(f32);

#[derive(Clone, Debug, PartialEq, Animatable)]
struct Marker;

#[test]
fn test_named_fields_interpolate() {
    let from = Camera {
        zoom: 1.0,
        center: Vector2::ZERO,
    };
    let to = Camera {
        zoom: 3.0,
        center: Vector2::new(40.0, -20.0),
    };
    let mid = Camera::lerp(&from, &to, 0.5);
    assert_eq!(
        mid,
        Camera {
            zoom: 2.0,
            center: Vector2::new(20.0, -10.0),
        }
    );
}

#[test]
fn test_tuple_struct_interpolates() {
    assert_eq!(Opacity::lerp(&Opacity(0.0), &Opacity(1.0), 0.25), Opacity(0.25));
}

#[test]
fn test_unit_struct_is_constant() {
    assert_eq!(Marker::lerp(&Marker, &Marker, 0.7), Marker);
}

#[test]
fn test_endpoints_are_exact() {
    let from = Camera {
        zoom: 1.5,
        center: Vector2::new(3.0, 4.0),
    };
    let to = Camera {
        zoom: 4.5,
        center: Vector2::new(-3.0, 9.0),
    };
    assert_eq!(Camera::lerp(&from, &to, 0.0), from);
    assert_eq!(Camera::lerp(&from, &to, 1.0), to);
}
