//! Reference parity for the kernel special functions in the argument
//! ranges the unit tests leave to the integration suite, plus the
//! short-range composition.

use eri3_core::numerics::special::boys::boys_sequence;
use eri3_core::{AnalyticTruncatedCoulomb, TruncatedCoulombApi};

fn assert_boys_close(t: f64, expected: &[f64], rel_tol: f64) {
    let mut values = vec![0.0; expected.len()];
    boys_sequence(expected.len() - 1, t, &mut values);
    for (order, (value, reference)) in values.iter().zip(expected).enumerate() {
        let err = (value - reference).abs() / reference;
        assert!(
            err <= rel_tol,
            "t={t} order={order}: actual {value:e} expected {reference:e} rel err {err:e}"
        );
    }
}

/// Higher truncated orders change sign and can cancel, so the error is
/// scaled by the larger of the reference magnitude and the Boys value.
fn assert_truncated_close(t: f64, r: f64, expected: &[f64], rel_tol: f64) {
    let evaluator = AnalyticTruncatedCoulomb::new();
    let max_order = expected.len() - 1;
    let mut values = vec![0.0; expected.len()];
    let mut boys = vec![0.0; expected.len()];
    assert!(!evaluator.evaluate(max_order, t, r, &mut values));
    boys_sequence(max_order, t, &mut boys);
    for (order, reference) in expected.iter().enumerate() {
        let scale = reference.abs().max(boys[order]);
        let err = (values[order] - reference).abs() / scale;
        assert!(
            err <= rel_tol,
            "t={t} r={r} order={order}: actual {:e} expected {reference:e} scaled err {err:e}",
            values[order]
        );
    }
}

#[test]
fn boys_matches_reference_in_the_series_tail_and_at_the_branch_seam() {
    assert_boys_close(
        12.0,
        &[
            2.55831430529383064e-01, 1.06593869298762384e-02, 1.33216735738647457e-03,
            2.77278857274126846e-04, 8.06169911902316597e-05, 2.99753628482815284e-05,
            1.34826991240736922e-05, 7.04711984415124136e-06, 4.14844105453918392e-06,
            2.68247023224324643e-06, 1.86761341913722801e-06, 1.37815289368973247e-06,
            1.06472100839731809e-06, 8.53075535691864256e-07, 7.03701129598005261e-07,
            5.94296683542247629e-07, 5.11624368186727765e-07,
        ],
        4.0e-15,
    );
    assert_boys_close(
        34.999,
        &[
            1.49801831381722761e-01, 2.14008730794768617e-03, 9.17206480734081937e-05,
            6.55166205272164611e-06, 6.55184924832429188e-07, 8.42404686256853005e-08,
            1.32381661511956879e-08, 2.45858680725737054e-09, 5.26855074112375398e-10,
            1.27954164815678700e-10, 3.47313994736334202e-11, 1.04197085317266022e-11,
            3.42370732145502442e-12, 1.22277853501346532e-12, 4.71647608543965655e-13,
            1.95393432744820607e-13, 8.65248331750390976e-14, 4.07824273875430493e-14,
            2.03827797374347114e-14,
        ],
        4.0e-15,
    );
}

#[test]
fn truncated_auxiliary_matches_reference_near_small_cutoffs() {
    assert_truncated_close(
        14.0,
        0.05,
        &[
            2.10055122302922040e-09, 2.09880555711363823e-09, 2.09706105260717002e-09,
            2.09531770888850427e-09, 2.09357552533660289e-09, 2.09183450133070571e-09,
            2.09009463625032675e-09, 2.08835592947525676e-09, 2.08661838038556025e-09,
            2.08488198836157928e-09, 2.08314675278392886e-09, 2.08141267303350111e-09,
            2.07967974849146195e-09, 2.07794797853925275e-09, 2.07621736255858908e-09,
            2.07448789993146239e-09, 2.07275959004013751e-09,
        ],
        5.0e-12,
    );
    assert_truncated_close(
        34.9,
        2.0,
        &[
            2.45436751072504236e-09, 1.70875687713796558e-09, 1.18044825536400845e-09,
            8.08675904636139069e-10, 5.48981995139202498e-10, 3.69014983446706367e-10,
            2.45367623266709996e-10, 1.61207449090639504e-10, 1.04509055976923478e-10,
            6.67415682453929846e-11, 4.18989698093752184e-11, 2.57875506939508220e-11,
            1.55052694301356109e-11, 9.06365605579187292e-12, 5.11502600339331901e-12,
            2.75706148960651359e-12, 1.39388892963184632e-12, 6.38143740506849471e-13,
            2.42562542430531088e-13,
        ],
        5.0e-12,
    );
}

#[test]
fn truncated_auxiliary_matches_reference_in_the_upward_range() {
    assert_truncated_close(
        90.0,
        7.5,
        &[
            2.31539141292035424e-04, 5.49052079852574586e-05, 1.21445200820008616e-05,
            2.45363763810070719e-06, 4.36069598995876049e-07, 6.26864770676294327e-08,
            5.38331421315959092e-09, -4.80913471065201727e-10, -3.24663814749068071e-10,
            -6.99598939110224823e-11, -4.32718451232486705e-12, 2.54311794912489481e-12,
            1.03784316945273614e-12, 1.55572475910558972e-13, -2.53765367326933243e-14,
        ],
        5.0e-12,
    );
}

#[test]
fn truncated_far_field_vector_is_the_boys_vector() {
    let evaluator = AnalyticTruncatedCoulomb::new();
    let mut out = [0.0; 9];
    assert!(evaluator.evaluate(8, 4.0, 14.0, &mut out));
    let mut boys = [0.0; 9];
    boys_sequence(8, 4.0, &mut boys);
    let expected = [
        4.41040695381210823e-01, 5.28406320615595823e-02, 1.75257821619930719e-02,
        8.66415899015389630e-03, 5.29168425529288715e-03, 3.66368992611272549e-03,
        2.74811878731322495e-03, 2.17623816829221831e-03, 1.79099170445613646e-03,
    ];
    for (order, reference) in expected.iter().enumerate() {
        let err = (boys[order] - reference).abs() / reference;
        assert!(err <= 4.0e-15, "order={order} rel err {err:e}");
    }
}

/// The short-range kernel G_m = F_m(T) - s^(m+1/2) F_m(sT) with
/// s = omega^2/(omega^2 + rho); deep in the attenuated regime the two Boys
/// terms cancel, so the error is scaled by the unattenuated F_m.
fn assert_short_range_close(t: f64, s: f64, expected: &[f64], rel_tol: f64) {
    let max_order = expected.len() - 1;
    let mut full = vec![0.0; expected.len()];
    let mut attenuated = vec![0.0; expected.len()];
    boys_sequence(max_order, t, &mut full);
    boys_sequence(max_order, s * t, &mut attenuated);
    let mut scale = s.sqrt();
    for (order, reference) in expected.iter().enumerate() {
        let value = full[order] - scale * attenuated[order];
        scale *= s;
        let denom = reference.abs().max(full[order]);
        let err = (value - reference).abs() / denom;
        assert!(
            err <= rel_tol,
            "t={t} s={s} order={order}: actual {value:e} expected {reference:e} scaled err {err:e}"
        );
    }
}

#[test]
fn short_range_composition_matches_reference() {
    assert_short_range_close(
        0.0,
        0.25,
        &[
            5.00000000000000000e-01, 2.91666666666666685e-01, 1.93750000000000006e-01,
            1.41741071428571425e-01, 1.10894097222222224e-01, 9.08647017045454558e-02,
            7.69136868990384637e-02, 6.66646321614583343e-02, 5.88230806238511025e-02,
            5.26314785605982716e-02, 4.76190249125162737e-02, 4.34782556865526276e-02,
            3.99999988079071042e-02, 3.70370367610896103e-02, 3.44827585564605119e-02,
            3.22580645011077000e-02, 3.03030302995025667e-02, 2.85714285705970343e-02,
            2.70270270268303803e-02,
        ],
        1.0e-14,
    );
    assert_short_range_close(
        0.9,
        0.6,
        &[
            1.11151703739597388e-01, 8.66538329412144676e-02, 6.90159734778649642e-02,
            5.61179753083295915e-02, 4.65319200897047550e-02, 3.92879968405555544e-02,
            3.37215385851476410e-02, 2.93725667972069386e-02, 2.59194495770535202e-02,
            2.31348240455697476e-02, 2.08561206960305376e-02, 1.89657149736775082e-02,
            1.73774621666277912e-02,
        ],
        1.0e-14,
    );
    assert_short_range_close(
        7.3,
        0.1,
        &[
            7.43911394810535948e-02, 1.54868906894188325e-02, 4.17975572801562809e-03,
            1.48953218482745565e-03, 6.78327364517671201e-04, 3.72921014095970013e-04,
            2.34802486979138539e-04, 1.62811366338240840e-04, 1.21003216382198922e-04,
            9.46244813173678732e-05, 7.68716796047362052e-05, 6.42990761469120744e-05,
            5.50232861444563943e-05, 4.79481766143807222e-05, 4.24015063979229058e-05,
            3.79523911196879388e-05, 3.43140650353858940e-05, 3.12894089708154428e-05,
            2.87390779989518921e-05,
        ],
        1.0e-14,
    );
    assert_short_range_close(
        55.0,
        0.85,
        &[
            4.85287695578730210e-23, 4.21210701428300942e-23, 3.65748988858650960e-23,
            3.17729443107249451e-23, 2.76140240522652682e-23, 2.40108500863147743e-23,
            2.08881055709664842e-23, 1.81807896162466954e-23, 1.58327924508166857e-23,
            1.37956687363122485e-23, 1.20275813155188704e-23,
        ],
        1.0e-14,
    );
}
